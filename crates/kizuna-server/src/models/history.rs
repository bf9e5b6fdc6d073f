//! History - Score Audit Trail Models

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use kizuna::{ScoreDeltas, ScoreHistoryEvent};

/// One score history event as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreHistoryResponse {
    pub id: Uuid,
    pub event_type: String,
    pub old_score: f64,
    pub new_score: f64,
    pub session_id: String,
    pub duration_seconds: i64,
    #[schema(value_type = Object)]
    pub deltas: ScoreDeltas,
    pub explanation: String,
    pub behaviors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ScoreHistoryResponse {
    pub fn from_domain(event: ScoreHistoryEvent) -> Self {
        Self {
            id: event.id,
            event_type: event.event_type,
            old_score: event.old_score,
            new_score: event.new_score,
            session_id: event.session_id,
            duration_seconds: event.duration_seconds,
            deltas: event.deltas,
            explanation: event.explanation,
            behaviors: event.behaviors,
            created_at: event.created_at,
        }
    }
}
