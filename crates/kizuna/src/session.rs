//! Session Registry
//!
//! In-process state machine tracking call session lifecycle and
//! disconnect recovery. The registry is a keyed map guarded by one
//! RwLock, constructed once at startup and shared through application
//! state. Correct for a single server instance; running replicas would
//! require promoting this to a shared store with per-key compare-and-swap.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{CallSession, SessionState};

/// Window within which a disconnected session can return to active
/// without losing in-call context or re-authenticating.
pub const RECOVERY_WINDOW_SECS: i64 = 30;

/// Registry of live call sessions
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, CallSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new active session. Replaces any prior entry with the same id.
    pub async fn create_session(&self, session_id: &str, user_id: Uuid) -> CallSession {
        let session = CallSession::new(session_id.to_string(), user_id);
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.to_string(), session.clone());
        tracing::info!("Session created: {} for user {}", session_id, user_id);
        session
    }

    /// Mark a session disconnected. Returns false for unknown or finalized sessions.
    pub async fn handle_disconnect(&self, session_id: &str) -> bool {
        self.handle_disconnect_at(session_id, Utc::now()).await
    }

    pub async fn handle_disconnect_at(&self, session_id: &str, now: DateTime<Utc>) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(session) if session.state == SessionState::Active => {
                session.disconnect(now);
                tracing::warn!("Session disconnected: {}", session_id);
                true
            }
            Some(session) => session.state == SessionState::Disconnected,
            None => false,
        }
    }

    /// Try to return a disconnected session to active.
    ///
    /// Unknown session: false. Active: true (no-op). Disconnected within
    /// the recovery window: back to active, true. Disconnected past the
    /// window: finalized as a side effect, false.
    pub async fn attempt_recovery(&self, session_id: &str) -> bool {
        self.attempt_recovery_at(session_id, Utc::now()).await
    }

    pub async fn attempt_recovery_at(&self, session_id: &str, now: DateTime<Utc>) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(session_id) else {
            return false;
        };

        match session.state {
            SessionState::Active => true,
            SessionState::Finalized => false,
            SessionState::Disconnected => {
                let elapsed = session
                    .disconnected_at
                    .map(|at| (now - at).num_seconds())
                    .unwrap_or(i64::MAX);

                if elapsed <= RECOVERY_WINDOW_SECS {
                    session.recover();
                    tracing::info!("Session recovered: {} ({}s offline)", session_id, elapsed);
                    true
                } else {
                    session.finalize(now);
                    tracing::warn!(
                        "Session recovery window elapsed, finalizing: {} ({}s offline)",
                        session_id,
                        elapsed
                    );
                    false
                }
            }
        }
    }

    /// Finalize a session. Terminal and idempotent.
    pub async fn finalize_session(&self, session_id: &str) -> Option<CallSession> {
        self.finalize_session_at(session_id, Utc::now()).await
    }

    pub async fn finalize_session_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Option<CallSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id)?;
        session.finalize(now);
        Some(session.clone())
    }

    /// Snapshot of a session's current state
    pub async fn get(&self, session_id: &str) -> Option<CallSession> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Number of sessions currently active
    pub async fn active_count(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.state == SessionState::Active)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_recovery_of_active_session_is_noop() {
        let registry = SessionRegistry::new();
        registry.create_session("sess_1", Uuid::new_v4()).await;

        assert!(registry.attempt_recovery("sess_1").await);
        assert_eq!(
            registry.get("sess_1").await.unwrap().state,
            SessionState::Active
        );
    }

    #[tokio::test]
    async fn test_recovery_within_window_returns_to_active() {
        let registry = SessionRegistry::new();
        registry.create_session("sess_1", Uuid::new_v4()).await;

        let disconnected_at = Utc::now();
        registry.handle_disconnect_at("sess_1", disconnected_at).await;

        let at_29s = disconnected_at + Duration::seconds(29);
        assert!(registry.attempt_recovery_at("sess_1", at_29s).await);

        let session = registry.get("sess_1").await.unwrap();
        assert_eq!(session.state, SessionState::Active);
        assert!(session.disconnected_at.is_none());
    }

    #[tokio::test]
    async fn test_recovery_past_window_finalizes() {
        let registry = SessionRegistry::new();
        registry.create_session("sess_1", Uuid::new_v4()).await;

        let disconnected_at = Utc::now();
        registry.handle_disconnect_at("sess_1", disconnected_at).await;

        let at_31s = disconnected_at + Duration::seconds(31);
        assert!(!registry.attempt_recovery_at("sess_1", at_31s).await);
        assert_eq!(
            registry.get("sess_1").await.unwrap().state,
            SessionState::Finalized
        );
    }

    #[tokio::test]
    async fn test_recovery_of_unknown_session_fails() {
        let registry = SessionRegistry::new();
        assert!(!registry.attempt_recovery("sess_missing").await);
    }

    #[tokio::test]
    async fn test_finalize_is_idempotent() {
        let registry = SessionRegistry::new();
        registry.create_session("sess_1", Uuid::new_v4()).await;

        let first = registry.finalize_session("sess_1").await.unwrap();
        let again = registry.finalize_session("sess_1").await.unwrap();

        assert_eq!(first.state, SessionState::Finalized);
        assert_eq!(again.finalized_at, first.finalized_at);
        assert!(!registry.attempt_recovery("sess_1").await);
    }

    #[tokio::test]
    async fn test_active_count_tracks_lifecycle() {
        let registry = SessionRegistry::new();
        registry.create_session("sess_1", Uuid::new_v4()).await;
        registry.create_session("sess_2", Uuid::new_v4()).await;
        assert_eq!(registry.active_count().await, 2);

        registry.handle_disconnect("sess_1").await;
        assert_eq!(registry.active_count().await, 1);

        registry.finalize_session("sess_2").await;
        assert_eq!(registry.active_count().await, 0);
    }
}
