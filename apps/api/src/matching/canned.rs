use crate::models::match_result::MatchResult;

/// A result record fixed at compile time.
#[derive(Debug)]
pub struct CannedResult {
    pub score: u8,
    pub matched_skills: &'static [&'static str],
    pub missing_skills: &'static [&'static str],
    pub suggestions: &'static [&'static str],
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl CannedResult {
    pub fn to_result(&self) -> MatchResult {
        MatchResult {
            score: self.score,
            matched_skills: owned(self.matched_skills),
            missing_skills: owned(self.missing_skills),
            suggestions: owned(self.suggestions),
        }
    }
}

pub static CANNED_RESULTS: [CannedResult; 2] = [
    CannedResult {
        score: 85,
        matched_skills: &[
            "JavaScript",
            "React",
            "Node.js",
            "Git",
            "Agile",
            "Problem Solving",
        ],
        missing_skills: &["TypeScript", "Docker", "AWS", "GraphQL"],
        suggestions: &[
            "Consider learning TypeScript to enhance JavaScript development",
            "Gain experience with containerization using Docker",
            "Explore cloud services, particularly AWS",
            "Learn GraphQL for modern API development",
        ],
    },
    CannedResult {
        score: 72,
        matched_skills: &["Python", "Machine Learning", "Data Analysis", "SQL"],
        missing_skills: &[
            "TensorFlow",
            "Deep Learning",
            "Apache Spark",
            "Kubernetes",
        ],
        suggestions: &[
            "Deepen your machine learning knowledge with TensorFlow",
            "Explore deep learning frameworks and techniques",
            "Learn big data processing with Apache Spark",
            "Gain experience with container orchestration using Kubernetes",
        ],
    },
];

/// True when `result` is exactly one of the canned records.
#[cfg(test)]
pub fn is_canned(result: &MatchResult) -> bool {
    CANNED_RESULTS.iter().any(|c| &c.to_result() == result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_85_and_72() {
        let scores: Vec<u8> = CANNED_RESULTS.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![85, 72]);
    }

    #[test]
    fn test_to_result_keeps_order() {
        let result = CANNED_RESULTS[0].to_result();
        assert_eq!(result.matched_skills.first().map(String::as_str), Some("JavaScript"));
        assert_eq!(result.matched_skills.last().map(String::as_str), Some("Problem Solving"));
        assert_eq!(result.missing_skills, vec!["TypeScript", "Docker", "AWS", "GraphQL"]);
        assert_eq!(result.suggestions.len(), 4);
    }

    #[test]
    fn test_is_canned_rejects_edited_record() {
        let mut result = CANNED_RESULTS[1].to_result();
        assert!(is_canned(&result));
        result.score = 73;
        assert!(!is_canned(&result));
    }
}
