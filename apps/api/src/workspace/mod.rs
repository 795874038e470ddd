//! Session-local state for one match page: the selected resume, the job
//! description, the in-progress latch and the last result.
//!
//! Every mutation goes through a method here so the display state
//! (idle / matching / results) can only ever be one of the three.

pub mod notifications;

use std::collections::VecDeque;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::match_result::MatchResult;
use crate::models::resume::UploadedFile;
use notifications::Notification;

/// Oldest notifications are dropped past this many undrained entries.
const NOTIFICATION_BACKLOG: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    Idle,
    Matching,
    Results,
}

/// Snapshot of the inputs handed to a matcher. Taken at submit time so the
/// matcher never needs the workspace lock.
#[derive(Debug, Clone)]
pub struct MatchInput {
    pub resume: UploadedFile,
    pub job_description: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("Please upload a resume and enter a job description")]
    MissingInformation,

    #[error("A match is already in progress")]
    InProgress,
}

#[derive(Debug, Default)]
pub struct Workspace {
    resume: Option<UploadedFile>,
    job_description: String,
    in_progress: bool,
    result: Option<MatchResult>,
    notifications: VecDeque<Notification>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume(&self) -> Option<&UploadedFile> {
        self.resume.as_ref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    pub fn display_state(&self) -> DisplayState {
        if self.in_progress {
            DisplayState::Matching
        } else if self.result.is_some() {
            DisplayState::Results
        } else {
            DisplayState::Idle
        }
    }

    /// Mirrors the submit control's enabled state.
    pub fn can_submit(&self) -> bool {
        !self.in_progress && self.has_required_inputs()
    }

    fn has_required_inputs(&self) -> bool {
        self.resume.is_some() && !self.job_description.trim().is_empty()
    }

    /// Stores an accepted file, replacing any earlier one.
    pub fn select_file(&mut self, file: UploadedFile) {
        let notification = Notification::upload_succeeded(&file);
        self.resume = Some(file);
        self.notify(notification);
    }

    /// Records a rejected selection. The stored file is left as it was.
    pub fn reject_file(&mut self) {
        self.notify(Notification::invalid_file_type());
    }

    pub fn set_job_description(&mut self, text: String) {
        self.job_description = text;
    }

    /// Validates inputs and raises the in-progress latch.
    pub fn begin_match(&mut self) -> Result<MatchInput, SubmitRejected> {
        if self.in_progress {
            return Err(SubmitRejected::InProgress);
        }
        let resume = match self.resume.clone() {
            Some(resume) if !self.job_description.trim().is_empty() => resume,
            _ => {
                self.notify(Notification::missing_information());
                return Err(SubmitRejected::MissingInformation);
            }
        };

        self.in_progress = true;
        Ok(MatchInput {
            resume,
            job_description: self.job_description.clone(),
        })
    }

    pub fn complete_match(&mut self, result: MatchResult) {
        let notification = Notification::analysis_complete(&result);
        self.result = Some(result);
        self.in_progress = false;
        self.notify(notification);
    }

    /// Clears the latch and keeps whatever result was shown before.
    pub fn fail_match(&mut self) {
        self.in_progress = false;
        self.notify(Notification::analysis_failed());
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn notify(&mut self, notification: Notification) {
        debug!(
            title = %notification.title,
            destructive = notification.is_destructive(),
            "Notification queued"
        );
        if self.notifications.len() == NOTIFICATION_BACKLOG {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }
}
