//! Mood - Derived companion mood for a call
//!
//! Derived from user state on demand, never stored.

use serde::{Deserialize, Serialize};

/// Companion mood presented to the conversation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Distant,
    Annoyed,
    Vulnerable,
    Warm,
    #[default]
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Distant => "distant",
            Mood::Annoyed => "annoyed",
            Mood::Vulnerable => "vulnerable",
            Mood::Warm => "warm",
            Mood::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
