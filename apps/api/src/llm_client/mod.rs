//! LLM client — the single point of entry for all Gemini API calls.
//!
//! No other module may call the Gemini REST API directly; everything goes
//! through `GeminiClient`, which admits each request through the shared
//! process-wide `RateLimiter` before it hits the network. Callers that need
//! structured output parse the returned text with `parse_json_response`,
//! which tolerates markdown code fences around the JSON payload.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::rate_limit::{RateLimitError, RateLimiter};

pub mod prompts;

const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// The model used for all LLM calls. Intentionally hardcoded to prevent drift.
pub const MODEL: &str = "gemini-2.0-flash";

/// Admission key for the shared rate limiter. One bucket per API identity,
/// not per caller, so concurrent uploads contend for the same quota.
pub const API_IDENTITY: &str = "gemini-api";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Quota(#[from] RateLimitError),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// Gemini generateContent wire types.

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// Abstraction over the text-generation provider so the pipeline can be
/// exercised with stub providers in tests. Carried in `AppState` as
/// `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// The production Gemini client. Every call is admitted through the shared
/// rate limiter under `API_IDENTITY`.
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: String,
    limiter: Arc<RateLimiter>,
}

impl GeminiClient {
    pub fn new(api_key: String, limiter: Arc<RateLimiter>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            api_url: GEMINI_API_URL.to_string(),
            api_key,
            limiter,
        }
    }

    async fn request(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or(LlmError::EmptyContent)?;

        debug!("Gemini call succeeded ({} chars)", text.len());
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.limiter
            .execute(API_IDENTITY, || self.request(prompt))
            .await
    }
}

/// Parses LLM output as JSON, stripping markdown code fences first.
/// The fence may be embedded mid-text; the model often prefixes prose.
pub fn parse_json_response<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(extract_json_payload(text)).map_err(LlmError::Parse)
}

/// Extracts the JSON payload from LLM output that may wrap it in
/// ```json ... ``` or ``` ... ``` fences, anywhere in the text.
fn extract_json_payload(text: &str) -> &str {
    let text = text.trim();
    for opener in ["```json", "```"] {
        if let Some(start) = text.find(opener) {
            let body = &text[start + opener.len()..];
            let body = match body.find("```") {
                Some(end) => &body[..end],
                None => body,
            };
            return body.trim();
        }
    }
    text
}
