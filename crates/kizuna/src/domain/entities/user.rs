//! User - The person a companion calls
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User - the subject of calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Contact number used to match inbound callers
    pub phone_number: Option<String>,
    /// Relationship progression stage (1-based)
    pub stage: i32,
    /// Current engagement state ("thrilled", "annoyed", ...)
    pub engagement_state: String,
    /// Inactive users cannot be called
    pub active: bool,
    /// Trait preferences forwarded to the persona layer
    pub trait_prefs: serde_json::Value,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user at stage 1 with default traits
    pub fn new(name: String, phone_number: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            phone_number,
            stage: 1,
            engagement_state: "neutral".to_string(),
            active: true,
            trait_prefs: serde_json::json!({}),
            last_interaction_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Per-dimension change produced by scoring one call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreDeltas {
    pub intimacy: f64,
    pub passion: f64,
    pub trust: f64,
    pub secureness: f64,
}

impl ScoreDeltas {
    /// All-zero deltas (empty transcript outcome)
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.intimacy == 0.0 && self.passion == 0.0 && self.trust == 0.0 && self.secureness == 0.0
    }
}

/// Relationship Score - current four-dimension relationship state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipScore {
    pub id: Uuid,
    pub user_id: Uuid,
    pub intimacy: f64,
    pub passion: f64,
    pub trust: f64,
    pub secureness: f64,
    pub updated_at: DateTime<Utc>,
}

impl RelationshipScore {
    /// Create initial score state for a new user
    pub fn new_for_user(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            intimacy: 10.0,
            passion: 10.0,
            trust: 10.0,
            secureness: 10.0,
            updated_at: Utc::now(),
        }
    }

    /// Mean of the four dimensions
    pub fn overall(&self) -> f64 {
        (self.intimacy + self.passion + self.trust + self.secureness) / 4.0
    }

    /// Apply deltas, clamping each dimension to 0..=100.
    /// Deltas themselves are not bounded here.
    pub fn apply(&mut self, deltas: &ScoreDeltas) {
        self.intimacy = (self.intimacy + deltas.intimacy).clamp(0.0, 100.0);
        self.passion = (self.passion + deltas.passion).clamp(0.0, 100.0);
        self.trust = (self.trust + deltas.trust).clamp(0.0, 100.0);
        self.secureness = (self.secureness + deltas.secureness).clamp(0.0, 100.0);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_clamps_dimensions() {
        let mut score = RelationshipScore::new_for_user(Uuid::new_v4());
        score.apply(&ScoreDeltas {
            intimacy: 150.0,
            passion: -50.0,
            trust: 5.0,
            secureness: 0.0,
        });

        assert_eq!(score.intimacy, 100.0);
        assert_eq!(score.passion, 0.0);
        assert_eq!(score.trust, 15.0);
        assert_eq!(score.secureness, 10.0);
    }

    #[test]
    fn test_overall_is_mean() {
        let mut score = RelationshipScore::new_for_user(Uuid::new_v4());
        score.intimacy = 40.0;
        score.passion = 20.0;
        score.trust = 60.0;
        score.secureness = 80.0;
        assert_eq!(score.overall(), 50.0);
    }
}
