//! Calling Platform Port
//!
//! Abstract interface for the remote conversational-AI calling
//! platform's outbound dialing capability.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

use super::context_builder::CallContext;

/// Result of a successfully placed outbound call
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OutboundCallInfo {
    pub call_id: String,
}

/// Service interface for placing outbound calls
#[async_trait]
pub trait CallingPlatform: Send + Sync {
    /// Place an outbound call, attaching the session token and persona
    /// context. Remote failures (including non-2xx responses) surface as
    /// `DomainError::ExternalService`, never as a panic.
    async fn start_outbound_call(
        &self,
        phone_number: &str,
        session_id: &str,
        token: &str,
        context: &CallContext,
    ) -> Result<OutboundCallInfo, DomainError>;
}
