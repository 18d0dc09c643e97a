use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::StudentProfile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseProfileRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseProfileResponse {
    pub profile: StudentProfile,
    /// "keyword" | "llm"
    pub backend: &'static str,
}

/// POST /api/v1/profiles/parse
pub async fn handle_parse_profile(
    State(state): State<AppState>,
    Json(req): Json<ParseProfileRequest>,
) -> Result<Json<ParseProfileResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let extractor = &state.orchestrator.producers().extractor;
    let profile = extractor.extract(&req.text).await;
    Ok(Json(ParseProfileResponse {
        profile,
        backend: extractor.backend(),
    }))
}
