//! Session registry. Owns each live workspace plus the match task that
//! belongs to it.
//!
//! A match task never outlives its session: `dispose` aborts it, and the task
//! only holds a `Weak` reference, so a result that arrives late is dropped
//! instead of being written into a workspace nobody can see.
//!
//! Sessions nobody has touched for the configured idle TTL are disposed by
//! the reaper task started from `main`.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::matching::Matcher;
use crate::workspace::{SubmitRejected, Workspace};

/// Abort handle of the running match. Once `closed` is set by `dispose`,
/// any match spawned afterwards is aborted on the spot.
#[derive(Default)]
struct InFlight {
    handle: Option<AbortHandle>,
    closed: bool,
}

pub struct Session {
    pub id: Uuid,
    workspace: Mutex<Workspace>,
    in_flight: Mutex<InFlight>,
    last_seen: Mutex<Instant>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            workspace: Mutex::new(Workspace::new()),
            in_flight: Mutex::new(InFlight::default()),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    async fn touch(&self) {
        *self.last_seen.lock().await = Instant::now();
    }

    async fn idle_for(&self) -> Duration {
        self.last_seen.lock().await.elapsed()
    }

    /// Locks the workspace. Never hold the guard across a matcher call.
    pub async fn workspace(&self) -> tokio::sync::MutexGuard<'_, Workspace> {
        self.workspace.lock().await
    }

    async fn cancel_in_flight(&self) {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.closed = true;
        if let Some(handle) = in_flight.handle.take() {
            handle.abort();
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new());
        let active = {
            let mut sessions = self.sessions.write().await;
            sessions.insert(session.id, session.clone());
            sessions.len()
        };
        info!(session_id = %session.id, active, "Session created");
        session
    }

    /// Looks a session up and marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        session.touch().await;
        Some(session)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes the session and cancels any match still running for it.
    /// Returns false when the id is unknown.
    pub async fn dispose(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(session) => {
                session.cancel_in_flight().await;
                info!(session_id = %id, "Session disposed");
                true
            }
            None => false,
        }
    }

    /// Disposes every session idle for at least `ttl`. A session with a
    /// match running is never idle: the match itself keeps it alive.
    pub async fn reap_idle(&self, ttl: Duration) -> usize {
        let candidates: Vec<Arc<Session>> =
            self.sessions.read().await.values().cloned().collect();

        let mut reaped = 0;
        for session in candidates {
            if session.idle_for().await < ttl || session.workspace().await.in_progress() {
                continue;
            }
            if self.dispose(session.id).await {
                reaped += 1;
            }
        }
        if reaped > 0 {
            info!(reaped, "Reaped idle sessions");
        }
        reaped
    }
}

/// Runs `reap_idle` on a fixed cadence for as long as the process lives.
pub fn spawn_reaper(store: SessionStore, ttl: Duration) -> JoinHandle<()> {
    let period = (ttl / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            store.reap_idle(ttl).await;
        }
    })
}

/// Validates the session's inputs, raises the in-progress latch and spawns
/// the match. The returned handle may be dropped; the task keeps running
/// until it finishes or the session is disposed.
///
/// `in_flight` is held from before the latch goes up until the abort handle
/// is stored, so a concurrent `dispose` always sees the task it must cancel.
pub async fn submit(
    session: &Arc<Session>,
    matcher: Arc<dyn Matcher>,
) -> Result<JoinHandle<()>, SubmitRejected> {
    let mut in_flight = session.in_flight.lock().await;
    let input = session.workspace().await.begin_match()?;
    let weak: Weak<Session> = Arc::downgrade(session);
    let session_id = session.id;

    info!(
        session_id = %session_id,
        backend = matcher.backend(),
        resume = %input.resume.name,
        "Match started"
    );

    let handle = tokio::spawn(async move {
        let outcome = matcher.run(&input).await;

        let Some(session) = weak.upgrade() else {
            debug!(session_id = %session_id, "Session gone before match finished; dropping result");
            return;
        };

        let mut ws = session.workspace().await;
        match outcome {
            Ok(result) => {
                info!(session_id = %session_id, score = result.score, "Match complete");
                ws.complete_match(result);
            }
            Err(e) => {
                warn!(session_id = %session_id, "Match failed: {e}");
                ws.fail_match();
            }
        }
    });

    if in_flight.closed {
        debug!(session_id = %session_id, "Session disposed during submit; aborting match");
        handle.abort();
    } else {
        in_flight.handle = Some(handle.abort_handle());
    }
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::canned::is_canned;
    use crate::matching::{MatchError, MockMatcher};
    use crate::models::match_result::MatchResult;
    use crate::models::resume::{UploadedFile, MIME_PDF};
    use crate::workspace::{DisplayState, MatchInput};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingMatcher;

    #[async_trait]
    impl Matcher for FailingMatcher {
        async fn run(&self, _input: &MatchInput) -> Result<MatchResult, MatchError> {
            Err(MatchError::Backend("upstream unavailable".to_string()))
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    async fn ready_session(store: &SessionStore) -> Arc<Session> {
        let session = store.create().await;
        {
            let mut ws = session.workspace().await;
            ws.select_file(UploadedFile::new("cv.pdf", MIME_PDF, 0).unwrap());
            ws.set_job_description("Platform engineer".to_string());
            ws.drain_notifications();
        }
        session
    }

    #[tokio::test]
    async fn test_create_get_dispose() {
        let store = SessionStore::new();
        let session = store.create().await;
        assert!(store.get(session.id).await.is_some());
        assert_eq!(store.len().await, 1);

        assert!(store.dispose(session.id).await);
        assert!(store.get(session.id).await.is_none());
        assert!(!store.dispose(session.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_runs_to_completion() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;
        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::default());

        let handle = submit(&session, matcher).await.unwrap();
        assert!(session.workspace().await.in_progress());

        handle.await.unwrap();

        let mut ws = session.workspace().await;
        assert!(!ws.in_progress());
        let result = ws.result().cloned().unwrap();
        assert!(is_canned(&result));
        let notes = ws.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].description, format!("Match score: {}%", result.score));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_in_progress_is_rejected() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;
        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::default());

        let handle = submit(&session, matcher.clone()).await.unwrap();
        let second = submit(&session, matcher).await;
        assert_eq!(second.unwrap_err(), SubmitRejected::InProgress);

        handle.await.unwrap();
        assert_eq!(session.workspace().await.display_state(), DisplayState::Results);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_description_leaves_flag_down() {
        let store = SessionStore::new();
        let session = store.create().await;
        session
            .workspace()
            .await
            .select_file(UploadedFile::new("cv.pdf", MIME_PDF, 0).unwrap());

        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::default());
        let err = submit(&session, matcher).await.unwrap_err();
        assert_eq!(err, SubmitRejected::MissingInformation);
        assert!(!session.workspace().await.in_progress());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_clears_flag_and_notifies() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;

        let handle = submit(&session, Arc::new(FailingMatcher)).await.unwrap();
        handle.await.unwrap();

        let mut ws = session.workspace().await;
        assert!(!ws.in_progress());
        assert!(ws.result().is_none());
        let notes = ws.drain_notifications();
        assert_eq!(notes[0].title, "Analysis failed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_in_flight_match() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;
        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::default());

        let handle = submit(&session, matcher).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.dispose(session.id).await);

        let joined = handle.await;
        assert!(joined.unwrap_err().is_cancelled());
        // No result was written into the orphaned workspace.
        let ws = session.workspace().await;
        assert!(ws.result().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_racing_submit_still_cancels() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;
        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::default());

        let (submitted, disposed) =
            tokio::join!(submit(&session, matcher), store.dispose(session.id));
        assert!(disposed);

        let joined = submitted.unwrap().await;
        assert!(joined.unwrap_err().is_cancelled());
        assert!(session.workspace().await.result().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_after_dispose_is_cancelled() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;
        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::default());

        let (disposed, submitted) =
            tokio::join!(store.dispose(session.id), submit(&session, matcher));
        assert!(disposed);

        let joined = submitted.unwrap().await;
        assert!(joined.unwrap_err().is_cancelled());
        assert!(session.workspace().await.result().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_handle_recorded_before_submit_returns() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;
        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::default());

        let handle = submit(&session, matcher).await.unwrap();
        assert!(session.in_flight.lock().await.handle.is_some());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_reaped() {
        let store = SessionStore::new();
        for _ in 0..200 {
            let session = store.create().await;
            session
                .workspace()
                .await
                .select_file(UploadedFile::new("cv.pdf", MIME_PDF, 1024 * 1024).unwrap());
        }
        assert_eq!(store.len().await, 200);

        let reaper = spawn_reaper(store.clone(), Duration::from_secs(30 * 60));
        tokio::time::sleep(Duration::from_secs(7 * 24 * 60 * 60)).await;

        assert_eq!(store.len().await, 0);
        reaper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_recently_used_session_survives_reap() {
        let store = SessionStore::new();
        let kept = store.create().await;
        let dropped = store.create().await;
        let ttl = Duration::from_secs(60);

        tokio::time::sleep(Duration::from_secs(40)).await;
        assert!(store.get(kept.id).await.is_some());
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(store.reap_idle(ttl).await, 1);
        assert!(store.get(kept.id).await.is_some());
        assert!(store.get(dropped.id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_with_running_match_is_not_reaped() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;
        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::new(Duration::from_secs(120)));

        let handle = submit(&session, matcher).await.unwrap();
        tokio::time::sleep(Duration::from_secs(90)).await;
        assert_eq!(store.reap_idle(Duration::from_secs(60)).await, 0);

        handle.await.unwrap();
        assert_eq!(session.workspace().await.display_state(), DisplayState::Results);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_dropped_when_session_gone() {
        let store = SessionStore::new();
        let session = ready_session(&store).await;
        let matcher: Arc<dyn Matcher> = Arc::new(MockMatcher::default());

        let handle = submit(&session, matcher).await.unwrap();
        // Drop every strong reference without aborting.
        store.sessions.write().await.remove(&session.id);
        drop(session);

        handle.await.unwrap();
        assert_eq!(store.len().await, 0);
    }
}
