use std::sync::Arc;

use sqlx::PgPool;

use crate::extraction::extractor::SkillExtractor;
use crate::matching::matcher::JobMatcher;

/// Shared application state injected into all route handlers via Axum
/// extractors.
///
/// The extractor and matcher own the process-wide caches and share the one
/// rate-limited LLM client; both are constructed exactly once at startup and
/// never re-instantiated, so cache and quota state survive for the life of
/// the process.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub extractor: Arc<SkillExtractor>,
    pub matcher: Arc<JobMatcher>,
}
