//! Axum route handlers for the Planning API.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Critique, Explanation, FourYearPlan, StudentProfile};
use crate::planning::orchestrator::{Backends, IterationRecord, PipelineOptions, PipelineResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    pub max_iterations: Option<usize>,
    pub min_score_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PlanFromTextRequest {
    pub text: String,
    #[serde(default)]
    pub max_iterations: Option<usize>,
    #[serde(default)]
    pub min_score_threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile: StudentProfile,
    pub plan: FourYearPlan,
    pub explanation: Explanation,
    pub evaluation: Critique,
    pub iterations: usize,
    pub iteration_history: Vec<IterationRecord>,
    pub final_score: f64,
    pub backends: Backends,
}

impl From<PipelineResult> for PlanResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            plan_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile: result.profile,
            plan: result.plan,
            explanation: result.explanation,
            evaluation: result.critique,
            iterations: result.iterations,
            iteration_history: result.iteration_history,
            final_score: result.final_score,
            backends: result.backends,
        }
    }
}

/// Upper bound on the per-request iteration override.
const MAX_ITERATIONS_LIMIT: usize = 10;

/// Applies per-request overrides on top of the configured defaults.
fn resolve_options(
    defaults: PipelineOptions,
    max_iterations: Option<usize>,
    min_score_threshold: Option<f64>,
) -> Result<PipelineOptions, AppError> {
    if let Some(requested) = max_iterations {
        if requested > MAX_ITERATIONS_LIMIT {
            return Err(AppError::Validation(format!(
                "max_iterations must be at most {MAX_ITERATIONS_LIMIT}, got {requested}"
            )));
        }
    }
    if let Some(threshold) = min_score_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::Validation(format!(
                "min_score_threshold must be between 0 and 1, got {threshold}"
            )));
        }
    }
    Ok(PipelineOptions {
        max_iterations: max_iterations.unwrap_or(defaults.max_iterations),
        min_score_threshold: min_score_threshold.unwrap_or(defaults.min_score_threshold),
        ..defaults
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/plans
/// Body is the raw profile mapping; missing or malformed fields fall back to defaults.
pub async fn handle_create_plan(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
    Json(raw): Json<Value>,
) -> Result<Json<PlanResponse>, AppError> {
    if !raw.is_object() {
        return Err(AppError::Validation(
            "Profile must be a JSON object".to_string(),
        ));
    }
    let options = resolve_options(
        state.orchestrator.defaults(),
        query.max_iterations,
        query.min_score_threshold,
    )?;

    let result = state.orchestrator.run_pipeline(&raw, options).await;
    info!(
        "Plan generated for {}: score={:.2}, iterations={}",
        result.profile.name, result.final_score, result.iterations
    );
    Ok(Json(result.into()))
}

/// POST /api/v1/plans/from-text
pub async fn handle_create_plan_from_text(
    State(state): State<AppState>,
    Json(req): Json<PlanFromTextRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let options = resolve_options(
        state.orchestrator.defaults(),
        req.max_iterations,
        req.min_score_threshold,
    )?;

    let profile = state
        .orchestrator
        .producers()
        .extractor
        .extract(&req.text)
        .await;
    let result = state.orchestrator.run_for_profile(profile, options).await;
    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_options_uses_defaults() {
        let options = resolve_options(PipelineOptions::default(), None, None).unwrap();
        assert_eq!(options, PipelineOptions::default());
    }

    #[test]
    fn test_resolve_options_overrides() {
        let options = resolve_options(PipelineOptions::default(), Some(1), Some(0.5)).unwrap();
        assert_eq!(options.max_iterations, 1);
        assert_eq!(options.min_score_threshold, 0.5);
        assert_eq!(options.top_k, 5);
    }

    #[test]
    fn test_resolve_options_rejects_out_of_range_threshold() {
        let result = resolve_options(PipelineOptions::default(), None, Some(1.5));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_resolve_options_bounds_max_iterations() {
        let at_limit =
            resolve_options(PipelineOptions::default(), Some(MAX_ITERATIONS_LIMIT), None).unwrap();
        assert_eq!(at_limit.max_iterations, MAX_ITERATIONS_LIMIT);

        let result = resolve_options(PipelineOptions::default(), Some(20_000), None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
