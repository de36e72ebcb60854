pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as resume_handlers;
use crate::matching::handlers as job_handlers;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resume/upload",
            post(resume_handlers::handle_resume_upload),
        )
        // Jobs API
        .route("/api/v1/jobs/match", post(job_handlers::handle_match_jobs))
        .route("/api/v1/jobs/search", get(job_handlers::handle_search_jobs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
