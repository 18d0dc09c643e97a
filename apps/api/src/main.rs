mod config;
mod errors;
mod llm_client;
mod models;
mod planning;
mod profile;
mod retrieval;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{LlmClient, TextCapability};
use crate::planning::orchestrator::{Orchestrator, PipelineOptions};
use crate::planning::strategy::Producers;
use crate::retrieval::catalog::OpportunityCatalog;
use crate::retrieval::corpus::ProfileStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Planner API v{}", env!("CARGO_PKG_VERSION"));

    // Reference corpus and opportunity catalog
    let store = Arc::new(ProfileStore::open(&config.profiles_path)?);
    info!(
        "Profile corpus loaded from {} ({} profiles)",
        config.profiles_path,
        store.count()
    );
    let catalog = Arc::new(OpportunityCatalog::open(&config.opportunities_path));

    // Generation capability is optional; without it every stage is rule-based
    let capability: Option<Arc<dyn TextCapability>> =
        LlmClient::from_api_key(config.anthropic_api_key.clone()).map(|client| {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(client) as Arc<dyn TextCapability>
        });
    let producers = Producers::select(capability);

    let defaults = PipelineOptions {
        max_iterations: config.max_iterations,
        min_score_threshold: config.min_score_threshold,
        top_k: config.similar_top_k,
    };
    let orchestrator = Arc::new(Orchestrator::new(
        store.clone(),
        catalog.clone(),
        producers,
        defaults,
    ));

    // Build app state
    let state = AppState {
        orchestrator,
        store,
        catalog,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
