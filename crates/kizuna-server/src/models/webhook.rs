//! Webhook - Post-Call Event Models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use kizuna::TranscriptEntry;

/// Asynchronous event posted by the calling platform after a call ends
#[derive(Debug, Deserialize, ToSchema)]
pub struct PostCallEvent {
    /// "post_call_transcription" or "call_failed"
    pub event_type: String,
    pub user_id: Uuid,
    pub session_id: String,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default)]
    pub duration_seconds: i64,
}

/// Acknowledgement for an event that needed no scoring
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
    pub session_id: String,
}
