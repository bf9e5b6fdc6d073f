//! CallScore - Outcome of scoring a finished call
//!
//! Pure domain entities without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::ScoreDeltas;

/// Aggregate score computed from a full call transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallScore {
    pub session_id: String,
    pub deltas: ScoreDeltas,
    pub explanation: String,
    pub duration_seconds: i64,
    pub behaviors_identified: Vec<String>,
    pub confidence: f64,
}

impl CallScore {
    /// Neutral score for a call with no transcript content
    pub fn empty(session_id: String, duration_seconds: i64) -> Self {
        Self {
            session_id,
            deltas: ScoreDeltas::zero(),
            explanation: "No conversation content to score".to_string(),
            duration_seconds,
            behaviors_identified: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Score for a single user/agent exchange, used for live display during a call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnScore {
    pub deltas: ScoreDeltas,
    pub comment: String,
}

/// ScoreHistoryEvent - append-only audit record of one call's effect
///
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreHistoryEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: String,
    pub old_score: f64,
    pub new_score: f64,
    pub session_id: String,
    pub duration_seconds: i64,
    pub deltas: ScoreDeltas,
    pub explanation: String,
    pub behaviors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ScoreHistoryEvent {
    /// Record the effect of a finished voice call
    pub fn voice_call(
        user_id: Uuid,
        old_score: f64,
        new_score: f64,
        score: &CallScore,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            event_type: "voice_call".to_string(),
            old_score,
            new_score,
            session_id: score.session_id.clone(),
            duration_seconds: score.duration_seconds,
            deltas: score.deltas,
            explanation: score.explanation.clone(),
            behaviors: score.behaviors_identified.clone(),
            created_at: Utc::now(),
        }
    }
}
