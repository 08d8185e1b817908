use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::types::{SessionAggregator, SessionRecord, SessionStats};
use crate::assess::Assessment;

/// Per-session aggregators keyed by a caller-supplied handle.
///
/// Each handle owns its own rolling window, so unrelated callers never
/// see each other's history. Appends run under one lock, which keeps
/// eviction order intact when the same session is recorded concurrently.
///
/// Sessions are created on first record and live until the caller drops
/// them with [`SessionStore::remove_session`]; the store never expires
/// handles on its own.
#[derive(Debug, Clone)]
pub struct SessionStore {
    capacity: usize,
    inner: Arc<Mutex<HashMap<String, SessionAggregator>>>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SessionAggregator>> {
        // The map stays consistent even if a holder panicked mid-record
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a raw record to `handle`'s window, creating the session if needed.
    pub fn record(&self, handle: &str, record: SessionRecord) -> SessionStats {
        let mut sessions = self.sessions();
        let session = sessions
            .entry(handle.to_string())
            .or_insert_with(|| SessionAggregator::new(self.capacity));
        let stats = session.record(record);
        debug!(session = handle, count = stats.count, "recorded assessment");
        stats
    }

    /// Record a completed assessment and return the session's rolling stats.
    pub fn record_and_summarize(&self, handle: &str, assessment: &Assessment) -> SessionStats {
        self.record(
            handle,
            SessionRecord::new(
                assessment.breakdown.total_score,
                assessment.breakdown.level,
                assessment.region_key.clone(),
            ),
        )
    }

    /// Empty a session's window. Returns false if the session did not exist.
    pub fn clear_session(&self, handle: &str) -> bool {
        match self.sessions().get_mut(handle) {
            Some(session) => {
                session.clear();
                true
            }
            None => false,
        }
    }

    /// Current stats for a session, or `None` if it does not exist.
    pub fn stats(&self, handle: &str) -> Option<SessionStats> {
        self.sessions().get(handle).map(SessionAggregator::stats)
    }

    /// Forget a session entirely.
    pub fn remove_session(&self, handle: &str) -> bool {
        self.sessions().remove(handle).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RiskLevel;
    use std::thread;

    fn rec(score: f64) -> SessionRecord {
        SessionRecord::new(score, RiskLevel::from_score(score), "USA")
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new(5);
        store.record("alice", rec(80.0));
        store.record("alice", rec(20.0));
        let bob = store.record("bob", rec(50.0));

        assert_eq!(bob.count, 1);
        assert_eq!(bob.average, Some(50.0));
        assert_eq!(store.stats("alice").unwrap().count, 2);
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_clear_session() {
        let store = SessionStore::new(5);
        store.record("alice", rec(80.0));
        assert!(store.clear_session("alice"));
        assert_eq!(store.stats("alice").unwrap().count, 0);
        assert!(!store.clear_session("nobody"));
    }

    #[test]
    fn test_remove_session() {
        let store = SessionStore::new(5);
        store.record("alice", rec(80.0));
        assert!(store.remove_session("alice"));
        assert!(store.stats("alice").is_none());
        assert!(!store.remove_session("alice"));
    }

    #[test]
    fn test_only_record_creates_sessions() {
        let store = SessionStore::new(5);
        assert!(store.stats("ghost").is_none());
        assert!(!store.clear_session("ghost"));
        assert_eq!(store.session_count(), 0);

        store.record("alice", rec(10.0));
        store.clear_session("alice");
        assert_eq!(store.session_count(), 1);
        store.remove_session("alice");
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_concurrent_records_same_session() {
        let store = SessionStore::new(20);
        thread::scope(|s| {
            for t in 0..4 {
                let store = &store;
                s.spawn(move || {
                    for i in 0..10 {
                        store.record("shared", rec((t * 10 + i) as f64));
                    }
                });
            }
        });

        let stats = store.stats("shared").unwrap();
        assert_eq!(stats.count, 20);
        let levels = stats.levels;
        assert_eq!(levels.low + levels.medium + levels.high, 20);
    }
}
