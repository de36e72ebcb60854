//! Axum route handlers for the jobs API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::matcher::MatchedJob;
use crate::models::job::{search_jobs, JobRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchJobsRequest {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchJobsResponse {
    pub matches: Vec<MatchedJob>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// POST /api/v1/jobs/match
///
/// The core pipeline operation: given extracted skills, return the ranked
/// matching jobs. An empty skill set yields an empty ranking, not an error.
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(request): Json<MatchJobsRequest>,
) -> Result<Json<MatchJobsResponse>, AppError> {
    let matches = state.matcher.match_jobs(&request.skills).await;
    Ok(Json(MatchJobsResponse { matches }))
}

/// GET /api/v1/jobs/search?query=...
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    if params.query.trim().is_empty() {
        return Err(AppError::Validation(
            "Search query is required".to_string(),
        ));
    }
    let jobs = search_jobs(&state.db, params.query.trim()).await?;
    Ok(Json(jobs))
}
