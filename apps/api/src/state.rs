use std::sync::Arc;

use crate::config::Config;
use crate::matching::Matcher;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    /// Pluggable matcher. Default: MockMatcher.
    pub matcher: Arc<dyn Matcher>,
}
