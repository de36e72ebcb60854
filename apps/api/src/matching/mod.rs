// Job matching pipeline: category inference, local keyword scoring, batched
// AI relevance analysis with per-job fallback, and the orchestrator that
// composes them. All LLM calls go through llm_client.

pub mod analyzer;
pub mod categories;
pub mod handlers;
pub mod local_score;
pub mod matcher;
pub mod prompts;
