use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a numeric variable is set but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub profiles_path: String,
    pub opportunities_path: String,
    /// Absent means the generation capability is unavailable.
    pub anthropic_api_key: Option<String>,
    pub max_iterations: usize,
    pub min_score_threshold: f64,
    pub similar_top_k: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            profiles_path: std::env::var("PROFILES_PATH")
                .unwrap_or_else(|_| "data/student_profiles.json".to_string()),
            opportunities_path: std::env::var("OPPORTUNITIES_PATH")
                .unwrap_or_else(|_| "data/opportunities.json".to_string()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            max_iterations: parse_env("MAX_ITERATIONS", 3)?,
            min_score_threshold: parse_env("MIN_SCORE_THRESHOLD", 0.7)?,
            similar_top_k: parse_env("SIMILAR_TOP_K", 5)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
