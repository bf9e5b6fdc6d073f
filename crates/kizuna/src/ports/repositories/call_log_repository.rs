//! Call Log Repository Port
//!
//! Audit backend for call-start records. Writes happen on a detached
//! task; a failure here must never affect the call being started.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Repository interface for call-start audit records
#[async_trait]
pub trait CallLogRepository: Send + Sync {
    /// Record that a call started for a user/session pair
    async fn record_start(&self, user_id: Uuid, session_id: &str) -> Result<(), DomainError>;
}
