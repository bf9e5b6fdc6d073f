//! Score History Repository Port
//!
//! Abstract interface for the append-only score audit trail.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, ScoreHistoryEvent};

/// Repository interface for score history events.
/// Events are append-only; there is no update or delete.
#[async_trait]
pub trait ScoreHistoryRepository: Send + Sync {
    /// Append one event to the audit trail
    async fn append(&self, event: &ScoreHistoryEvent) -> Result<(), DomainError>;

    /// Most recent events for a user, newest first
    async fn recent(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ScoreHistoryEvent>, DomainError>;
}
