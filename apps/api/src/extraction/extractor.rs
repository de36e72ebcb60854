//! AI-backed skill and role extraction from résumé text.
//!
//! Same rate-limit and cache pattern as the relevance analyzer, but keyed on
//! the résumé text itself. Malformed provider payloads degrade to default
//! values; only transport-level failures propagate to the handler.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::{stable_hash, ResponseCache};
use crate::extraction::prompts::{role_prediction_prompt, skill_extraction_prompt};
use crate::llm_client::{parse_json_response, LlmError, TextGenerator};

/// Skills and background extracted from a résumé.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: f64,
    #[serde(default = "not_specified")]
    pub education: String,
}

impl Default for ExtractedProfile {
    fn default() -> Self {
        Self {
            skills: Vec::new(),
            experience: 0.0,
            education: not_specified(),
        }
    }
}

fn not_specified() -> String {
    "Not specified".to_string()
}

/// AI-predicted job role for a candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePrediction {
    #[serde(default = "default_role")]
    pub predicted_role: String,
    #[serde(default = "default_confidence")]
    pub confidence: String,
    #[serde(default = "default_role_reason")]
    pub reason: String,
}

fn default_role() -> String {
    "Professional".to_string()
}

fn default_confidence() -> String {
    "medium".to_string()
}

fn default_role_reason() -> String {
    "Based on skills and experience".to_string()
}

impl Default for RolePrediction {
    fn default() -> Self {
        Self {
            predicted_role: default_role(),
            confidence: "low".to_string(),
            reason: "Default role based on general skills".to_string(),
        }
    }
}

pub struct SkillExtractor {
    llm: Arc<dyn TextGenerator>,
    profiles: ResponseCache<ExtractedProfile>,
    roles: ResponseCache<RolePrediction>,
}

impl SkillExtractor {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self {
            llm,
            profiles: ResponseCache::default(),
            roles: ResponseCache::default(),
        }
    }

    /// Extracts skills, experience and education from résumé text.
    ///
    /// Provider failures propagate; a response that is not the expected JSON
    /// degrades to an empty default profile.
    pub async fn extract_profile(&self, resume_text: &str) -> Result<ExtractedProfile, LlmError> {
        let key = format!("skills:{}", stable_hash(resume_text));
        if let Some(hit) = self.profiles.get(&key) {
            return Ok(hit);
        }

        let text = self
            .llm
            .generate(&skill_extraction_prompt(resume_text))
            .await?;
        let profile = match parse_json_response::<ExtractedProfile>(&text) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Failed to parse skill extraction response: {e}");
                ExtractedProfile::default()
            }
        };

        self.profiles.put(key, profile.clone());
        Ok(profile)
    }

    /// Predicts the most suitable job role for the candidate.
    pub async fn predict_role(
        &self,
        resume_text: &str,
        skills: &[String],
        experience: f64,
    ) -> Result<RolePrediction, LlmError> {
        let key = format!("role:{}", stable_hash(resume_text));
        if let Some(hit) = self.roles.get(&key) {
            return Ok(hit);
        }

        let text = self
            .llm
            .generate(&role_prediction_prompt(resume_text, skills, experience))
            .await?;
        let prediction = match parse_json_response::<RolePrediction>(&text) {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!("Failed to parse role prediction response: {e}");
                RolePrediction::default()
            }
        };

        self.roles.put(key, prediction.clone());
        Ok(prediction)
    }
}
