//! View layer: pure projections of a `Workspace` into what the page shows.

pub mod page;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::match_result::MatchResult;
use crate::models::resume::{ACCEPTED_EXTENSIONS, ADVERTISED_MAX_BYTES};
use crate::workspace::{DisplayState, Workspace};

pub const IDLE_MESSAGE: &str = "Upload your resume and enter a job description to see your personalized AI match analysis";
pub const SUBMIT_LABEL: &str = "Analyze Match with AI";
pub const SUBMIT_LABEL_BUSY: &str = "Analyzing with AI...";

/// Qualitative band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    NeedsDevelopment,
}

impl ScoreTier {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ScoreTier::Excellent
        } else if score >= 60 {
            ScoreTier::Good
        } else {
            ScoreTier::NeedsDevelopment
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent match! You're a strong candidate.",
            ScoreTier::Good => "Good match with room for improvement.",
            ScoreTier::NeedsDevelopment => "Consider developing additional skills for this role.",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "emerald",
            ScoreTier::Good => "amber",
            ScoreTier::NeedsDevelopment => "red",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultPanel {
    pub score: u8,
    pub tier: ScoreTier,
    pub description: &'static str,
    pub color: &'static str,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ResultPanel {
    pub fn from_result(result: &MatchResult) -> Self {
        let tier = ScoreTier::from_score(result.score);
        Self {
            score: result.score,
            tier,
            description: tier.description(),
            color: tier.color(),
            matched_skills: result.matched_skills.clone(),
            missing_skills: result.missing_skills.clone(),
            suggestions: result.suggestions.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressStep {
    pub label: &'static str,
    pub percent: u8,
}

pub const PROGRESS_STEPS: [ProgressStep; 3] = [
    ProgressStep {
        label: "Parsing resume content...",
        percent: 33,
    },
    ProgressStep {
        label: "Analyzing job requirements...",
        percent: 66,
    },
    ProgressStep {
        label: "Computing AI match score...",
        percent: 90,
    },
];

/// Exactly one of these is shown in the results column.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Panel {
    Idle {
        message: &'static str,
    },
    Matching {
        title: &'static str,
        steps: Vec<ProgressStep>,
    },
    Results(ResultPanel),
}

impl Panel {
    pub fn for_workspace(ws: &Workspace) -> Self {
        match (ws.display_state(), ws.result()) {
            (DisplayState::Matching, _) => Panel::Matching {
                title: "AI Analysis in Progress",
                steps: PROGRESS_STEPS.to_vec(),
            },
            (DisplayState::Results, Some(result)) => {
                Panel::Results(ResultPanel::from_result(result))
            }
            _ => Panel::Idle {
                message: IDLE_MESSAGE,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadHints {
    pub accept: &'static str,
    pub max_bytes: u64,
    pub label: &'static str,
}

impl Default for UploadHints {
    fn default() -> Self {
        Self {
            accept: ACCEPTED_EXTENSIONS,
            max_bytes: ADVERTISED_MAX_BYTES,
            label: "Upload your resume in PDF, DOCX, or TXT format (Max 10MB)",
        }
    }
}

/// Everything a client needs to draw the page.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub resume_name: Option<String>,
    pub resume_uploaded_at: Option<DateTime<Utc>>,
    pub job_description: String,
    pub display_state: DisplayState,
    pub can_submit: bool,
    pub submit_label: &'static str,
    pub upload: UploadHints,
    pub panel: Panel,
}

impl SessionView {
    pub fn new(session_id: Uuid, ws: &Workspace) -> Self {
        Self {
            session_id,
            resume_name: ws.resume().map(|f| f.name.clone()),
            resume_uploaded_at: ws.resume().map(|f| f.uploaded_at),
            job_description: ws.job_description().to_string(),
            display_state: ws.display_state(),
            can_submit: ws.can_submit(),
            submit_label: if ws.in_progress() {
                SUBMIT_LABEL_BUSY
            } else {
                SUBMIT_LABEL
            },
            upload: UploadHints::default(),
            panel: Panel::for_workspace(ws),
        }
    }
}
