//! Context Builder Port
//!
//! Abstract interface for the persona/prompt layer. Prompt content is
//! generated elsewhere; this contract only guarantees the two values
//! the calling platform requires on every call.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, RelationshipScore, User};

/// Connection context handed to the calling platform.
/// Both values are always non-null JSON objects.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CallContext {
    pub dynamic_variables: serde_json::Value,
    pub conversation_config_override: serde_json::Value,
}

impl CallContext {
    /// Empty but well-formed context. The platform requires both keys
    /// even when a call is rejected.
    pub fn empty() -> Self {
        Self {
            dynamic_variables: serde_json::json!({}),
            conversation_config_override: serde_json::json!({}),
        }
    }
}

/// Service interface for building per-call persona context
#[async_trait]
pub trait ContextBuilder: Send + Sync {
    /// Build the connection context for a call with this user
    async fn build(
        &self,
        user: &User,
        score: &RelationshipScore,
    ) -> Result<CallContext, DomainError>;
}
