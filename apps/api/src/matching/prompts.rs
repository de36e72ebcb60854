//! Prompt builders for job relevance analysis.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::models::job::JobRow;

const ANALYSIS_CRITERIA: &str = "Consider:\n\
    1. Direct skill matches\n\
    2. Related skills and technologies\n\
    3. Industry relevance\n\
    4. Experience level requirements";

/// One prompt covering a whole batch of jobs. The provider must answer with
/// a JSON array of `{score, reason}` objects in the same order as the input
/// list; results are zipped back to jobs by position.
pub fn batch_analysis_prompt(skills: &[String], jobs: &[JobRow]) -> String {
    let skills_json = serde_json::to_string(skills).unwrap_or_else(|_| "[]".to_string());
    let job_list = jobs
        .iter()
        .map(|job| format!("- {}", job.job_description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the relevance of these jobs to the candidate's skills.\n\n\
         Skills: {skills_json}\n\n\
         Jobs:\n{job_list}\n\n\
         {ANALYSIS_CRITERIA}\n\n\
         For each job, in the same order as listed, give an integer score from 0 to 100 \
         (0 = not relevant, 100 = highly relevant) and a brief explanation.\n\
         Format: [{{\"score\": 0, \"reason\": \"Brief explanation\"}}]\n\
         {JSON_ONLY_INSTRUCTION}"
    )
}

/// Single-job prompt used by the per-job fallback path.
pub fn single_analysis_prompt(skills: &[String], description: &str) -> String {
    let skills_json = serde_json::to_string(skills).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Analyze the relevance of this job to the candidate's skills.\n\n\
         Skills: {skills_json}\n\n\
         Job Description:\n{description}\n\n\
         {ANALYSIS_CRITERIA}\n\n\
         Give an integer score from 0 to 100 (0 = not relevant, 100 = highly relevant) \
         and a brief explanation.\n\
         Format: {{\"score\": 0, \"reason\": \"Brief explanation\"}}\n\
         {JSON_ONLY_INSTRUCTION}"
    )
}
