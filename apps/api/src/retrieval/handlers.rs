//! Axum route handlers for the reference corpus and opportunity catalog.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{Grade, Opportunity, StudentProfile};
use crate::retrieval::corpus::{reference_from_raw, CorpusStatistics};
use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ProfileSearchQuery {
    /// Comma-separated.
    pub interests: Option<String>,
    pub major: Option<String>,
    pub college: Option<String>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct OpportunityQuery {
    pub grade: i64,
    /// Comma-separated, optional.
    #[serde(default)]
    pub interests: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddProfileResponse {
    pub profile: StudentProfile,
    pub total_profiles: usize,
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profiles/search
/// Exactly one of `interests`, `major` or `college` selects the search mode.
pub async fn handle_search_profiles(
    State(state): State<AppState>,
    Query(query): Query<ProfileSearchQuery>,
) -> Result<Json<Vec<StudentProfile>>, AppError> {
    let top_k = query.top_k.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let store = &state.store;

    let results = match (query.interests, query.major, query.college) {
        (Some(interests), None, None) => {
            let keywords = split_csv(&interests);
            if keywords.is_empty() {
                return Err(AppError::Validation("No interests provided".to_string()));
            }
            store.search_by_interests(&keywords, top_k)
        }
        (None, Some(major), None) => store.search_by_major(major.trim(), top_k),
        (None, None, Some(college)) => store.search_by_college(college.trim(), top_k),
        _ => {
            return Err(AppError::Validation(
                "Provide exactly one of interests, major or college".to_string(),
            ))
        }
    };
    Ok(Json(results))
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(State(state): State<AppState>) -> Json<Vec<StudentProfile>> {
    Json(state.store.get_all_profiles())
}

/// GET /api/v1/profiles/stats
pub async fn handle_profile_stats(State(state): State<AppState>) -> Json<CorpusStatistics> {
    Json(state.store.statistics())
}

/// POST /api/v1/profiles
/// Adds a reference profile (loose profile fields plus optional `colleges_admitted`
/// and `final_major`) to the corpus.
pub async fn handle_add_profile(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<(StatusCode, Json<AddProfileResponse>), AppError> {
    if !raw.is_object() {
        return Err(AppError::Validation(
            "Profile must be a JSON object".to_string(),
        ));
    }
    let record = reference_from_raw(&raw);
    let profile = record.profile.clone();

    let store = state.store.clone();
    let total_profiles = tokio::task::spawn_blocking(move || store.add_profile(record))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Corpus write task failed: {e}")))??;

    Ok((
        StatusCode::CREATED,
        Json(AddProfileResponse {
            profile,
            total_profiles,
        }),
    ))
}

/// GET /api/v1/opportunities
pub async fn handle_get_opportunities(
    State(state): State<AppState>,
    Query(query): Query<OpportunityQuery>,
) -> Result<Json<Vec<Opportunity>>, AppError> {
    let grade = Grade::from_value(query.grade).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid grade: {}. Must be 9, 10, 11, or 12",
            query.grade
        ))
    })?;
    let interests = query.interests.as_deref().map(split_csv).unwrap_or_default();
    Ok(Json(state.catalog.for_grade(grade, &interests)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_csv_trims_and_drops_empty() {
        assert_eq!(split_csv(" Math, ,Physics ,"), vec!["Math", "Physics"]);
        assert!(split_csv("").is_empty());
    }
}
