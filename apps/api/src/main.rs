mod cache;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod models;
mod rate_limit;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::extractor::SkillExtractor;
use crate::llm_client::GeminiClient;
use crate::matching::analyzer::RelevanceAnalyzer;
use crate::matching::matcher::JobMatcher;
use crate::models::job::PgJobCatalog;
use crate::rate_limit::RateLimiter;
use crate::routes::build_router;
use crate::state::AppState;

// Gemini free-tier quota: 15 requests per minute, blocked for a minute once
// exhausted.
const RATE_LIMIT_POINTS: u32 = 15;
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
const RATE_LIMIT_BLOCK: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // One rate limiter per external API identity, shared by every call site
    let limiter = Arc::new(RateLimiter::new(
        RATE_LIMIT_POINTS,
        RATE_LIMIT_WINDOW,
        RATE_LIMIT_BLOCK,
    ));

    // Initialize the LLM client
    let llm = Arc::new(GeminiClient::new(config.gemini_api_key.clone(), limiter));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Process-wide services: extractor and matcher own their caches
    let extractor = Arc::new(SkillExtractor::new(llm.clone()));
    let analyzer = RelevanceAnalyzer::new(llm, Arc::new(ResponseCache::default()));
    let matcher = Arc::new(JobMatcher::new(
        Arc::new(PgJobCatalog::new(db.clone())),
        analyzer,
    ));

    let state = AppState {
        db,
        extractor,
        matcher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
