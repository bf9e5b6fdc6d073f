//! Call - Outbound Call Models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use kizuna::ScoreDeltas;

/// Request to start a call for a user
#[derive(Debug, Deserialize, ToSchema)]
pub struct InitiateCallRequest {
    pub user_id: Uuid,
}

/// Connection bundle returned to the calling platform.
/// Inbound acceptances use the same shape, so the platform sees one
/// contract regardless of call direction.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionBundle {
    pub agent_id: Option<String>,
    pub token: String,
    pub session_id: String,
    #[schema(value_type = Object)]
    pub dynamic_variables: serde_json::Value,
    #[schema(value_type = Object)]
    pub conversation_config_override: serde_json::Value,
}

/// Request to place an outbound phone call
#[derive(Debug, Deserialize, ToSchema)]
pub struct OutboundCallRequest {
    pub user_id: Uuid,
    pub phone_number: String,
}

/// Result of attempting an outbound call. Platform failures come back
/// as `success: false`, never as a transport error.
#[derive(Debug, Serialize, ToSchema)]
pub struct OutboundCallResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OutboundCallResult {
    pub fn placed(call_id: String) -> Self {
        Self {
            success: true,
            message: "Call placed".to_string(),
            call_id: Some(call_id),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            call_id: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of settling a finished call
#[derive(Debug, Serialize, ToSchema)]
pub struct EndCallOutcome {
    pub success: bool,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub deltas: Option<ScoreDeltas>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EndCallOutcome {
    pub fn settled(session_id: impl Into<String>, new_score: f64, deltas: ScoreDeltas) -> Self {
        Self {
            success: true,
            session_id: session_id.into(),
            new_score: Some(new_score),
            deltas: Some(deltas),
            error: None,
        }
    }

    pub fn failed(session_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: session_id.into(),
            new_score: None,
            deltas: None,
            error: Some(error.into()),
        }
    }
}
