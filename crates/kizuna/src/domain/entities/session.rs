//! CallSession - Lifecycle of one live call
//!
//! Pure domain entity without infrastructure dependencies.
//! Sessions live only in process memory; they are never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifecycle state. `Finalized` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Disconnected,
    Finalized,
}

/// CallSession - state tracked for one live call from admission to finalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    pub session_id: String,
    pub user_id: Uuid,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub disconnected_at: Option<DateTime<Utc>>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl CallSession {
    /// Create a new active session
    pub fn new(session_id: String, user_id: Uuid) -> Self {
        Self {
            session_id,
            user_id,
            state: SessionState::Active,
            created_at: Utc::now(),
            disconnected_at: None,
            finalized_at: None,
        }
    }

    /// Mark the session disconnected at `now`
    pub fn disconnect(&mut self, now: DateTime<Utc>) {
        self.state = SessionState::Disconnected;
        self.disconnected_at = Some(now);
    }

    /// Clear the disconnect marker and return to active
    pub fn recover(&mut self) {
        self.state = SessionState::Active;
        self.disconnected_at = None;
    }

    /// Finalize the session. Idempotent: the first finalization timestamp wins.
    pub fn finalize(&mut self, now: DateTime<Utc>) {
        if self.state != SessionState::Finalized {
            self.state = SessionState::Finalized;
            self.finalized_at = Some(now);
        }
    }
}
