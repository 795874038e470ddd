use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";

/// File-picker extension hint. Only a hint: acceptance is decided by MIME type.
pub const ACCEPTED_EXTENSIONS: &str = ".pdf,.docx,.txt";

/// Size limit shown to the user. Not checked against uploads.
pub const ADVERTISED_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// The content types a resume may be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeFormat {
    Pdf,
    Docx,
    PlainText,
}

impl ResumeFormat {
    /// Maps a browser-reported MIME type onto the allow-list.
    /// Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(MIME_PDF) {
            Some(ResumeFormat::Pdf)
        } else if essence.eq_ignore_ascii_case(MIME_DOCX) {
            Some(ResumeFormat::Docx)
        } else if essence.eq_ignore_ascii_case(MIME_TEXT) {
            Some(ResumeFormat::PlainText)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => MIME_PDF,
            ResumeFormat::Docx => MIME_DOCX,
            ResumeFormat::PlainText => MIME_TEXT,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadRejected {
    #[error("Unsupported content type: {0}")]
    InvalidType(String),
}

/// A resume as selected by the user. Replaced wholesale on re-selection.
/// Only metadata is kept: the content is never inspected, so it is not stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub format: ResumeFormat,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: &str,
        size_bytes: u64,
    ) -> Result<Self, UploadRejected> {
        let format = ResumeFormat::from_mime(content_type)
            .ok_or_else(|| UploadRejected::InvalidType(content_type.to_string()))?;
        Ok(Self {
            name: name.into(),
            format,
            size_bytes,
            uploaded_at: Utc::now(),
        })
    }

    pub fn exceeds_advertised_limit(&self) -> bool {
        self.size_bytes > ADVERTISED_MAX_BYTES
    }
}
