//! Memory Service Port
//!
//! Abstract interface for the semantic memory collaborator.
//! Search internals (embeddings, ranking) are out of scope here.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// A memory returned from semantic search
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MemoryHit {
    pub content: String,
    pub category: String,
    pub similarity: f32,
}

/// Service interface for semantic memory
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Search memories for a user by semantic similarity
    async fn search(
        &self,
        user_id: Uuid,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryHit>, DomainError>;

    /// Store one fact with a category tag
    async fn store(&self, user_id: Uuid, content: &str, category: &str)
        -> Result<(), DomainError>;
}
