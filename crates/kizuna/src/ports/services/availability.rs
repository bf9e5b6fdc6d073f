//! Availability Policy Port
//!
//! Business rule deciding whether a user can be connected right now.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, User};

/// Outcome of an availability check. Rejection reasons are fixed,
/// human-readable strings surfaced to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable { reason: String },
}

/// Service interface for call admission policy
#[async_trait]
pub trait AvailabilityPolicy: Send + Sync {
    /// Decide whether the user can take a call now
    async fn check(&self, user: &User) -> Result<Availability, DomainError>;
}
