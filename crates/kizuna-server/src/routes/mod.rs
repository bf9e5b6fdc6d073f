//! Kizuna API Routes
//!
//! - /kizuna/calls - outbound call initiation and dialing
//! - /kizuna/calls/inbound - pre-call decision for platform-initiated calls
//! - /kizuna/calls/tools - in-call tool dispatch (capability token)
//! - /kizuna/webhooks/post-call - signed post-call events
//! - /kizuna/users/:id/history - score audit trail

pub mod call;
pub mod inbound;
pub mod swagger;
pub mod tools;
pub mod users;
pub mod webhook;

use axum::http::StatusCode;
use kizuna::DomainError;

/// Map domain errors to transport status codes
pub(crate) fn map_domain_error(e: DomainError) -> (StatusCode, String) {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::NotAvailable(_) => StatusCode::FORBIDDEN,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
