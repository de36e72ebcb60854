//! Prompt builders for résumé skill and role extraction.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// How much résumé text goes into the skill extraction prompt.
pub const RESUME_EXCERPT_CHARS: usize = 10_000;

/// How much résumé text goes into the role prediction prompt.
pub const ROLE_EXCERPT_CHARS: usize = 5_000;

pub fn skill_extraction_prompt(resume_text: &str) -> String {
    format!(
        "Given the following resume content, extract a list of relevant professional skills.\n\
         Return a JSON object with:\n\
         - skills: array of technical skills and tools\n\
         - experience: years of experience as a number\n\
         - education: highest education level\n\
         {JSON_ONLY_INSTRUCTION}\n\n\
         Resume:\n{}",
        truncate(resume_text, RESUME_EXCERPT_CHARS)
    )
}

pub fn role_prediction_prompt(resume_text: &str, skills: &[String], experience: f64) -> String {
    format!(
        "Based on the following resume content, skills, and experience, predict the most \
         suitable job role.\n\
         Return a JSON object with:\n\
         - predictedRole: most suitable job title\n\
         - confidence: high/medium/low\n\
         - reason: brief explanation\n\
         {JSON_ONLY_INSTRUCTION}\n\n\
         Resume Summary:\n{}\n\n\
         Skills: {}\n\
         Experience: {experience} years",
        truncate(resume_text, ROLE_EXCERPT_CHARS),
        skills.join(", ")
    )
}

/// Char-boundary-safe prefix of `text`.
fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
