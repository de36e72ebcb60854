//! Fixed domain-category taxonomy and the skill-set classifier.
//!
//! Each category carries a static keyword list. Classification is a plain
//! substring count; a skill may count toward several categories. The
//! enumeration order of `Category::ALL` is the tie-break order and must stay
//! fixed for deterministic results.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "IT")]
    It,
    Engineering,
    Science,
    Finance,
    Healthcare,
    Education,
    Marketing,
    Operations,
    Legal,
    Other,
}

impl Category {
    /// All classifiable categories in fixed tie-break order. `Other` is the
    /// fallback and never competes.
    pub const ALL: [Category; 9] = [
        Category::It,
        Category::Engineering,
        Category::Science,
        Category::Finance,
        Category::Healthcare,
        Category::Education,
        Category::Marketing,
        Category::Operations,
        Category::Legal,
    ];

    /// Static keyword list used both for classification and for pre-filtering
    /// the job catalog. Lowercase by construction.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::It => &[
                "javascript", "python", "java", "node.js", "react", "angular", "vue", "sql",
                "aws", "azure", "docker", "kubernetes", "devops", "cloud", "database",
                "full stack", "backend", "frontend", "software", "developer", "engineer",
                "programming", "coding", "tech", "technology",
            ],
            Category::Engineering => &[
                "civil", "mechanical", "electrical", "structural", "mechanics", "materials",
                "drafting", "cad", "autocad", "solidworks", "revit", "engineer", "engineering",
                "design", "construction",
            ],
            Category::Science => &[
                "biology", "chemistry", "physics", "research", "laboratory", "lab",
                "microbiology", "genetics", "biochemistry", "pharmaceutical", "science",
                "scientist", "researcher",
            ],
            Category::Finance => &[
                "finance", "accounting", "financial", "banking", "investment", "analyst",
                "financial analyst", "accountant", "cpa", "tax", "audit",
            ],
            Category::Healthcare => &[
                "nurse", "doctor", "medical", "healthcare", "hospital", "clinical", "pharmacy",
                "pharmacist", "physician", "health", "care",
            ],
            Category::Education => &[
                "teacher", "education", "professor", "instructor", "teaching", "school",
                "university", "training", "tutor",
            ],
            Category::Marketing => &[
                "marketing", "advertising", "sales", "promotion", "digital marketing",
                "content", "social media", "brand", "strategy", "market",
            ],
            Category::Operations => &[
                "operations", "logistics", "supply chain", "management", "operations manager",
                "logistics coordinator", "supply chain analyst",
            ],
            Category::Legal => &[
                "law", "legal", "attorney", "lawyer", "paralegal", "legal assistant",
                "litigation", "compliance", "contract",
            ],
            Category::Other => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::It => "IT",
            Category::Engineering => "Engineering",
            Category::Science => "Science",
            Category::Finance => "Finance",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Marketing => "Marketing",
            Category::Operations => "Operations",
            Category::Legal => "Legal",
            Category::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Maps a skill set to the best-matching category.
///
/// For each category, counts the skills that case-insensitively contain any
/// of its keywords. The strictly highest count wins; ties resolve to the
/// earlier category in `Category::ALL`. All-zero counts yield `Other`.
pub fn classify(skills: &[String]) -> Category {
    let lowered: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();

    let mut best = Category::Other;
    let mut best_count = 0usize;

    for category in Category::ALL {
        let count = lowered
            .iter()
            .filter(|skill| category.keywords().iter().any(|kw| skill.contains(kw)))
            .count();
        if count > best_count {
            best = category;
            best_count = count;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_it_skills_classify_as_it() {
        let category = classify(&skills(&["python", "docker", "aws"]));
        assert_eq!(category, Category::It);
    }

    #[test]
    fn test_healthcare_skills_classify_as_healthcare() {
        let category = classify(&skills(&["clinical trials", "nurse practitioner", "pharmacy"]));
        assert_eq!(category, Category::Healthcare);
    }

    #[test]
    fn test_no_overlap_returns_other() {
        let category = classify(&skills(&["juggling", "origami"]));
        assert_eq!(category, Category::Other);
    }

    #[test]
    fn test_empty_skill_set_returns_other() {
        assert_eq!(classify(&[]), Category::Other);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let category = classify(&skills(&["Python", "AWS"]));
        assert_eq!(category, Category::It);
    }

    #[test]
    fn test_substring_match_counts() {
        // "javascript developer" contains both "javascript" and "developer";
        // still one skill, counted once for IT.
        let category = classify(&skills(&["javascript developer"]));
        assert_eq!(category, Category::It);
    }

    #[test]
    fn test_tie_breaks_to_earlier_category() {
        // "engineer" appears in both the IT and Engineering keyword lists, so
        // both categories count 1. IT precedes Engineering in ALL.
        let category = classify(&skills(&["engineer"]));
        assert_eq!(category, Category::It);
    }

    #[test]
    fn test_skill_may_count_toward_multiple_categories() {
        // "research" is a Science keyword, "market research" also hits
        // Marketing via "market". Two marketing skills outweigh one science hit.
        let category = classify(&skills(&["market research", "brand strategy"]));
        assert_eq!(category, Category::Marketing);
    }

    #[test]
    fn test_other_has_no_keywords() {
        assert!(Category::Other.keywords().is_empty());
    }

    #[test]
    fn test_serde_rename_for_it() {
        let json = serde_json::to_string(&Category::It).unwrap();
        assert_eq!(json, "\"IT\"");
    }
}
