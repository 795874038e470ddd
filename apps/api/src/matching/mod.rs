//! Matching: pluggable, trait-based backend that turns a resume and a job
//! description into a `MatchResult`.
//!
//! Default: `MockMatcher`, which does no analysis at all. It waits a fixed
//! delay and hands back one of two canned records chosen at random.
//!
//! `AppState` holds an `Arc<dyn Matcher>`.

pub mod canned;

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::debug;

use crate::models::match_result::MatchResult;
use crate::workspace::MatchInput;
use canned::CANNED_RESULTS;

pub const DEFAULT_MATCH_DELAY_MS: u64 = 3_000;
pub const DEFAULT_MATCH_DELAY: Duration = Duration::from_millis(DEFAULT_MATCH_DELAY_MS);

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Matcher backend failed: {0}")]
    Backend(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap the matching backend without touching the
/// session runner or the handlers.
#[async_trait]
pub trait Matcher: Send + Sync {
    async fn run(&self, input: &MatchInput) -> Result<MatchResult, MatchError>;

    /// Short label for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// MockMatcher, the only backend
// ────────────────────────────────────────────────────────────────────────────

/// Stand-in for a real analysis service. The input is ignored: neither the
/// file content nor the description influences the output.
pub struct MockMatcher {
    delay: Duration,
}

impl MockMatcher {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_DELAY)
    }
}

#[async_trait]
impl Matcher for MockMatcher {
    async fn run(&self, input: &MatchInput) -> Result<MatchResult, MatchError> {
        debug!(
            resume = %input.resume.name,
            jd_chars = input.job_description.len(),
            "Mock matcher sleeping {:?}",
            self.delay
        );
        tokio::time::sleep(self.delay).await;

        let picked = CANNED_RESULTS
            .choose(&mut rand::rng())
            .ok_or_else(|| MatchError::Backend("no canned results".to_string()))?;
        Ok(picked.to_result())
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}
