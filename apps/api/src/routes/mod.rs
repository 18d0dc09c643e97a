pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::planning::handlers as plans;
use crate::profile::handlers as profiles;
use crate::retrieval::handlers as corpus;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Planning API
        .route("/api/v1/plans", post(plans::handle_create_plan))
        .route(
            "/api/v1/plans/from-text",
            post(plans::handle_create_plan_from_text),
        )
        // Profiles API
        .route(
            "/api/v1/profiles",
            get(corpus::handle_list_profiles).post(corpus::handle_add_profile),
        )
        .route("/api/v1/profiles/parse", post(profiles::handle_parse_profile))
        .route(
            "/api/v1/profiles/search",
            get(corpus::handle_search_profiles),
        )
        .route("/api/v1/profiles/stats", get(corpus::handle_profile_stats))
        // Opportunities API
        .route(
            "/api/v1/opportunities",
            get(corpus::handle_get_opportunities),
        )
        .with_state(state)
}
