//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Not available: {0}")]
    NotAvailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: Uuid) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn not_found_str<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }
}

/// Capability token validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Token does not have the expected shape
    #[error("Malformed token")]
    Malformed,

    /// Token is older than the validity window
    #[error("Token expired")]
    Expired,

    /// Recomputed signature does not match
    #[error("Bad token signature")]
    BadSignature,
}

/// Webhook signature verification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    /// Signature header does not parse as `t=<ts>,v=<hex>`
    #[error("Malformed signature header")]
    MalformedHeader,

    /// Timestamp is outside the replay window
    #[error("Stale webhook timestamp")]
    Stale,

    /// Recomputed MAC does not match
    #[error("Bad webhook signature")]
    BadSignature,
}
