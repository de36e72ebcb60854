//! AI relevance analyzer: batches jobs into shared prompts, parses the
//! structured response, and degrades gracefully when the provider misbehaves.
//!
//! Failure policy: nothing here returns an error to the caller. A failed
//! batch falls back to per-job analysis; a failed per-job analysis yields a
//! zero score with an explanatory reason. AI-side trouble must never abort a
//! matching run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::cache::{stable_hash, ResponseCache};
use crate::llm_client::{parse_json_response, LlmError, TextGenerator};
use crate::matching::local_score::NO_MATCH_REASON;
use crate::matching::prompts::{batch_analysis_prompt, single_analysis_prompt};
use crate::models::job::JobRow;

/// Jobs per combined prompt. Five keeps prompts small enough for reliable
/// structured output while cutting call volume 5x.
pub const BATCH_SIZE: usize = 5;

const ANALYSIS_FAILED_REASON: &str = "Failed to analyze relevance";

/// One `{score, reason}` element of the provider's structured response.
/// Scores are bounded to 0-100 by the prompt contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceAnalysis {
    pub score: u32,
    pub reason: String,
}

/// A job paired with its AI-derived relevance.
#[derive(Debug, Clone)]
pub struct JobAnalysis {
    pub job: JobRow,
    pub relevance: u32,
    pub reason: String,
}

pub struct RelevanceAnalyzer {
    llm: Arc<dyn TextGenerator>,
    cache: Arc<ResponseCache<RelevanceAnalysis>>,
}

impl RelevanceAnalyzer {
    pub fn new(llm: Arc<dyn TextGenerator>, cache: Arc<ResponseCache<RelevanceAnalysis>>) -> Self {
        Self { llm, cache }
    }

    /// Analyzes jobs in fixed-size groups, preserving input order. Groups are
    /// processed sequentially so provider calls stay deterministic under the
    /// shared rate limiter.
    pub async fn analyze_batch(&self, skills: &[String], jobs: Vec<JobRow>) -> Vec<JobAnalysis> {
        self.cache.purge_expired();

        let mut analyses = Vec::with_capacity(jobs.len());
        for group in jobs.chunks(BATCH_SIZE) {
            match self.analyze_group(skills, group).await {
                Ok(mut group_analyses) => analyses.append(&mut group_analyses),
                Err(e) => {
                    warn!("Batch analysis failed ({e}); falling back to per-job analysis");
                    for job in group {
                        let analysis = self.analyze_job(skills, &job.job_description).await;
                        analyses.push(JobAnalysis {
                            job: job.clone(),
                            relevance: analysis.score,
                            reason: analysis.reason,
                        });
                    }
                }
            }
        }
        analyses
    }

    async fn analyze_group(
        &self,
        skills: &[String],
        group: &[JobRow],
    ) -> Result<Vec<JobAnalysis>, LlmError> {
        let prompt = batch_analysis_prompt(skills, group);
        let text = self.llm.generate(&prompt).await?;
        let analyses: Vec<RelevanceAnalysis> = parse_json_response(&text)?;

        // Positional zip; a short response yields results for the prefix only.
        Ok(group
            .iter()
            .cloned()
            .zip(analyses)
            .map(|(job, analysis)| JobAnalysis {
                job,
                relevance: analysis.score,
                reason: analysis.reason,
            })
            .collect())
    }

    /// Single-job analysis, also the fallback path for failed batches.
    ///
    /// Checks the cache first, then short-circuits to a zero score when no
    /// skill appears in the description at all (no provider call). Successful
    /// results are cached under a key derived from skills + description.
    pub async fn analyze_job(&self, skills: &[String], description: &str) -> RelevanceAnalysis {
        let key = analysis_cache_key(skills, description);
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        let description_lower = description.to_lowercase();
        let any_overlap = skills
            .iter()
            .any(|skill| description_lower.contains(&skill.to_lowercase()));
        if !any_overlap {
            return RelevanceAnalysis {
                score: 0,
                reason: NO_MATCH_REASON.to_string(),
            };
        }

        let prompt = single_analysis_prompt(skills, description);
        match self.request_analysis(&prompt).await {
            Ok(analysis) => {
                self.cache.put(key, analysis.clone());
                analysis
            }
            Err(e) => {
                error!("Error analyzing job relevance: {e}");
                RelevanceAnalysis {
                    score: 0,
                    reason: ANALYSIS_FAILED_REASON.to_string(),
                }
            }
        }
    }

    async fn request_analysis(&self, prompt: &str) -> Result<RelevanceAnalysis, LlmError> {
        let text = self.llm.generate(prompt).await?;
        parse_json_response(&text)
    }
}

fn analysis_cache_key(skills: &[String], description: &str) -> String {
    let input = format!("{}|{}", skills.join(","), description);
    format!("analysis:{}", stable_hash(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RETENTION_WINDOW;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    /// Scripted provider: pops replies front to back, repeating the last one
    /// once the script is exhausted. Counts every call.
    struct StubGenerator {
        script: Mutex<VecDeque<String>>,
        calls: AtomicUsize,
    }

    impl StubGenerator {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                Ok(script.pop_front().unwrap())
            } else {
                script
                    .front()
                    .cloned()
                    .ok_or(LlmError::EmptyContent)
            }
        }
    }

    fn analyzer(llm: Arc<dyn TextGenerator>) -> RelevanceAnalyzer {
        RelevanceAnalyzer::new(llm, Arc::new(ResponseCache::default()))
    }

    fn job(description: &str) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            job_title: "Role".to_string(),
            job_location: "Remote".to_string(),
            apply_link: None,
            job_description: description.to_string(),
            source: None,
            created_at: Utc::now(),
        }
    }

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_batch_of_two_parses_and_zips_in_order() {
        let stub = StubGenerator::new(&[
            r#"[{"score": 80, "reason": "strong"}, {"score": 30, "reason": "weak"}]"#,
        ]);
        let analyzer = analyzer(stub.clone());

        let jobs = vec![job("python shop"), job("python-adjacent shop")];
        let results = analyzer.analyze_batch(&skills(&["python"]), jobs).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].relevance, 80);
        assert_eq!(results[0].reason, "strong");
        assert_eq!(results[1].relevance, 30);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_batch_falls_back_to_per_job() {
        // First call (the batch) returns garbage; the five fallback calls get
        // a valid single-job object.
        let stub = StubGenerator::new(&[
            "this is not json",
            r#"{"score": 75, "reason": "strong match"}"#,
        ]);
        let analyzer = analyzer(stub.clone());

        let jobs: Vec<JobRow> = (0..5).map(|i| job(&format!("python role {i}"))).collect();
        let results = analyzer.analyze_batch(&skills(&["python"]), jobs).await;

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.relevance == 75));
        // 1 batch call + 5 individual calls.
        assert_eq!(stub.call_count(), 6);
    }

    #[tokio::test]
    async fn test_jobs_split_into_groups_of_five() {
        let batch_reply = r#"[
            {"score": 10, "reason": "r"}, {"score": 10, "reason": "r"},
            {"score": 10, "reason": "r"}, {"score": 10, "reason": "r"},
            {"score": 10, "reason": "r"}
        ]"#;
        let stub = StubGenerator::new(&[batch_reply]);
        let analyzer = analyzer(stub.clone());

        let jobs: Vec<JobRow> = (0..10).map(|i| job(&format!("python role {i}"))).collect();
        let results = analyzer.analyze_batch(&skills(&["python"]), jobs).await;

        assert_eq!(results.len(), 10);
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_short_batch_response_yields_prefix_only() {
        let stub = StubGenerator::new(&[r#"[{"score": 60, "reason": "only one"}]"#]);
        let analyzer = analyzer(stub);

        let jobs = vec![job("python a"), job("python b"), job("python c")];
        let results = analyzer.analyze_batch(&skills(&["python"]), jobs).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relevance, 60);
    }

    #[tokio::test]
    async fn test_single_job_no_overlap_short_circuits_without_call() {
        let stub = StubGenerator::new(&[r#"{"score": 99, "reason": "never used"}"#]);
        let analyzer = analyzer(stub.clone());

        let analysis = analyzer
            .analyze_job(&skills(&["rust"]), "Looking for a pastry chef")
            .await;

        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.reason, NO_MATCH_REASON);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_job_result_is_cached() {
        let stub = StubGenerator::new(&[r#"{"score": 75, "reason": "strong match"}"#]);
        let analyzer = analyzer(stub.clone());
        let the_skills = skills(&["python"]);

        let first = analyzer.analyze_job(&the_skills, "python role").await;
        let second = analyzer.analyze_job(&the_skills, "python role").await;

        assert_eq!(first.score, 75);
        assert_eq!(second.score, 75);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_cache_entry_triggers_fresh_call() {
        let stub = StubGenerator::new(&[r#"{"score": 75, "reason": "strong match"}"#]);
        let analyzer = analyzer(stub.clone());
        let the_skills = skills(&["python"]);

        analyzer.analyze_job(&the_skills, "python role").await;
        tokio::time::advance(RETENTION_WINDOW + Duration::from_secs(1)).await;
        analyzer.analyze_job(&the_skills, "python role").await;

        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_single_job_malformed_response_degrades_to_zero() {
        let stub = StubGenerator::new(&["{broken"]);
        let analyzer = analyzer(stub);

        let analysis = analyzer.analyze_job(&skills(&["python"]), "python role").await;

        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.reason, ANALYSIS_FAILED_REASON);
    }

    #[tokio::test]
    async fn test_failed_single_result_is_not_cached() {
        let stub = StubGenerator::new(&["{broken", r#"{"score": 40, "reason": "ok"}"#]);
        let analyzer = analyzer(stub.clone());
        let the_skills = skills(&["python"]);

        let first = analyzer.analyze_job(&the_skills, "python role").await;
        let second = analyzer.analyze_job(&the_skills, "python role").await;

        assert_eq!(first.score, 0);
        assert_eq!(second.score, 40);
        assert_eq!(stub.call_count(), 2);
    }

    #[test]
    fn test_cache_key_is_deterministic_and_input_sensitive() {
        let skills_a = skills(&["python", "aws"]);
        assert_eq!(
            analysis_cache_key(&skills_a, "desc"),
            analysis_cache_key(&skills_a, "desc")
        );
        assert_ne!(
            analysis_cache_key(&skills_a, "desc"),
            analysis_cache_key(&skills_a, "other desc")
        );
    }
}
