//! Deterministic keyword-overlap scorer, the cheap first pass before any AI
//! analysis.

/// Points awarded per matching skill. Deliberately uncapped: a job matching
/// six or more skills scores above 100, while AI-side scores stay within
/// 0-100 by the prompt contract. Do not clamp; the asymmetry is intended
/// and pinned by test.
pub const POINTS_PER_MATCH: u32 = 20;

pub const NO_MATCH_REASON: &str = "No direct skill matches found";

#[derive(Debug, Clone)]
pub struct LocalScore {
    pub relevance: u32,
    pub reason: String,
    pub matched: Vec<String>,
}

/// Scores a job description against a skill set by case-insensitive
/// substring match. relevance = 20 x matching skills.
pub fn score_job(skills: &[String], description: &str) -> LocalScore {
    let description = description.to_lowercase();

    let matched: Vec<String> = skills
        .iter()
        .filter(|skill| description.contains(&skill.to_lowercase()))
        .cloned()
        .collect();

    let relevance = matched.len() as u32 * POINTS_PER_MATCH;
    let reason = if matched.is_empty() {
        NO_MATCH_REASON.to_string()
    } else {
        format!("Direct matches found: {}", matched.join(", "))
    };

    LocalScore {
        relevance,
        reason,
        matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_each_match_is_worth_twenty_points() {
        let score = score_job(
            &skills(&["python", "docker", "aws"]),
            "We need a Python developer with AWS experience",
        );
        assert_eq!(score.relevance, 40);
        assert_eq!(score.matched, vec!["python", "aws"]);
    }

    #[test]
    fn test_no_matches_scores_zero_with_fixed_reason() {
        let score = score_job(&skills(&["rust", "go"]), "Looking for a civil engineer");
        assert_eq!(score.relevance, 0);
        assert_eq!(score.reason, NO_MATCH_REASON);
        assert!(score.matched.is_empty());
    }

    #[test]
    fn test_reason_lists_matched_skills() {
        let score = score_job(&skills(&["python", "sql"]), "Python and SQL required");
        assert_eq!(score.reason, "Direct matches found: python, sql");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let score = score_job(&skills(&["PyThOn"]), "senior PYTHON engineer");
        assert_eq!(score.relevance, 20);
    }

    #[test]
    fn test_score_is_uncapped_beyond_one_hundred() {
        // Six matching skills score 120. Pinned on purpose: do not clamp.
        let six = skills(&["python", "aws", "sql", "docker", "react", "java"]);
        let score = score_job(
            &six,
            "python aws sql docker react java shop seeks a generalist",
        );
        assert_eq!(score.relevance, 120);
    }

    #[test]
    fn test_empty_skill_set_scores_zero() {
        let score = score_job(&[], "any description");
        assert_eq!(score.relevance, 0);
        assert_eq!(score.reason, NO_MATCH_REASON);
    }

    #[test]
    fn test_relevance_is_a_multiple_of_twenty() {
        let score = score_job(&skills(&["a", "b", "c"]), "a b");
        assert_eq!(score.relevance % POINTS_PER_MATCH, 0);
    }
}
