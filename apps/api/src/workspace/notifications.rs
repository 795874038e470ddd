use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::match_result::MatchResult;
use crate::models::resume::UploadedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Normal,
    Destructive,
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn new(title: &str, description: String, variant: Variant) -> Self {
        Self {
            title: title.to_string(),
            description,
            variant,
            created_at: Utc::now(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }

    pub fn upload_succeeded(file: &UploadedFile) -> Self {
        Self::new(
            "Resume uploaded successfully",
            format!("{} is ready for analysis", file.name),
            Variant::Normal,
        )
    }

    pub fn invalid_file_type() -> Self {
        Self::new(
            "Invalid file type",
            "Please upload a PDF, DOCX, or TXT file".to_string(),
            Variant::Destructive,
        )
    }

    pub fn missing_information() -> Self {
        Self::new(
            "Missing information",
            "Please upload a resume and enter a job description".to_string(),
            Variant::Destructive,
        )
    }

    pub fn analysis_complete(result: &MatchResult) -> Self {
        Self::new(
            "Analysis complete",
            format!("Match score: {}%", result.score),
            Variant::Normal,
        )
    }

    pub fn analysis_failed() -> Self {
        Self::new(
            "Analysis failed",
            "Please try again later".to_string(),
            Variant::Destructive,
        )
    }
}
