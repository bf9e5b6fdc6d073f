//! User Repository Port
//!
//! Abstract interface for user and relationship score persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, RelationshipScore, User};

/// Repository interface for User entities and their score state
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by contact phone number (inbound caller lookup)
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError>;

    /// Find the relationship score for a user
    async fn find_score(&self, user_id: Uuid) -> Result<Option<RelationshipScore>, DomainError>;

    /// Save a relationship score (insert or update)
    async fn save_score(&self, score: &RelationshipScore)
        -> Result<RelationshipScore, DomainError>;

    /// Update the user's last interaction timestamp to now
    async fn touch_last_interaction(&self, user_id: Uuid) -> Result<(), DomainError>;
}
