//! Matching orchestrator: classify, pre-filter, locally score, and only then
//! spend AI calls on the jobs local heuristics could not settle.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::matching::analyzer::RelevanceAnalyzer;
use crate::matching::categories::classify;
use crate::matching::local_score::score_job;
use crate::models::job::{JobCatalog, JobRow};

/// Local score at or above which AI analysis is skipped entirely. A job can
/// only get here with at least three direct skill matches.
pub const STRONG_LOCAL_THRESHOLD: u32 = 60;

/// Minimum AI-reported relevance for a job to appear in the final ranking.
pub const MIN_AI_RELEVANCE: u32 = 50;

/// Which stage produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Local,
    Ai,
}

/// A catalog job annotated with its relevance to the candidate. Discarded
/// after the response is sent; nothing here is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedJob {
    #[serde(flatten)]
    pub job: JobRow,
    pub relevance: u32,
    pub reason: String,
    pub source: MatchSource,
}

pub struct JobMatcher {
    catalog: Arc<dyn JobCatalog>,
    analyzer: RelevanceAnalyzer,
}

impl JobMatcher {
    pub fn new(catalog: Arc<dyn JobCatalog>, analyzer: RelevanceAnalyzer) -> Self {
        Self { catalog, analyzer }
    }

    /// Returns ranked matches for a skill set, descending by relevance.
    ///
    /// Never fails: any unexpected error is logged and collapsed into an
    /// empty list. The caller always gets a (possibly empty) ranking.
    pub async fn match_jobs(&self, skills: &[String]) -> Vec<MatchedJob> {
        match self.rank_jobs(skills).await {
            Ok(matches) => matches,
            Err(e) => {
                error!("Error matching jobs: {e}");
                Vec::new()
            }
        }
    }

    async fn rank_jobs(&self, skills: &[String]) -> Result<Vec<MatchedJob>, AppError> {
        if skills.is_empty() {
            return Ok(Vec::new());
        }

        let category = classify(skills);
        info!("Classified skill set as category '{category}'");

        // Category pre-filter: the job must mention at least one keyword of
        // the classified category. `Other` has no keywords, so an
        // unclassifiable skill set matches nothing.
        let keywords = category.keywords();
        let candidates: Vec<JobRow> = self
            .catalog
            .find_all()
            .await?
            .into_iter()
            .filter(|job| {
                let description = job.job_description.to_lowercase();
                keywords.iter().any(|kw| description.contains(kw))
            })
            .collect();

        // Local first pass; zero-score jobs are out regardless of what the
        // AI might have said about them.
        let locally_scored: Vec<(JobRow, u32, String)> = candidates
            .into_iter()
            .filter_map(|job| {
                let score = score_job(skills, &job.job_description);
                (score.relevance > 0).then(|| (job, score.relevance, score.reason))
            })
            .collect();

        // Enough strong local matches: skip AI analysis, a cost and latency
        // optimization. Only the strong set is returned.
        let mut strong: Vec<MatchedJob> = locally_scored
            .iter()
            .filter(|(_, relevance, _)| *relevance >= STRONG_LOCAL_THRESHOLD)
            .map(|(job, relevance, reason)| MatchedJob {
                job: job.clone(),
                relevance: *relevance,
                reason: reason.clone(),
                source: MatchSource::Local,
            })
            .collect();
        if !strong.is_empty() {
            strong.sort_by(|a, b| b.relevance.cmp(&a.relevance));
            return Ok(strong);
        }

        // Weak-but-nonzero local matches go to the AI analyzer in batches.
        let needing_ai: Vec<JobRow> = locally_scored.into_iter().map(|(job, _, _)| job).collect();
        let analyses = self.analyzer.analyze_batch(skills, needing_ai).await;

        let mut matches: Vec<MatchedJob> = analyses
            .into_iter()
            .filter(|a| a.relevance >= MIN_AI_RELEVANCE)
            .map(|a| MatchedJob {
                job: a.job,
                relevance: a.relevance,
                reason: a.reason,
                source: MatchSource::Ai,
            })
            .collect();
        matches.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        Ok(matches)
    }
}
