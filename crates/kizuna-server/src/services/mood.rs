//! Mood Service - Deterministic mood derivation
//!
//! Derives the companion mood for a call from user state. Rules are
//! evaluated top-down; the first match wins.

use kizuna::Mood;

/// Thresholds for mood derivation (configurable)
#[derive(Debug, Clone)]
pub struct MoodConfig {
    /// Stage at or above which high scores read as vulnerable
    pub vulnerable_stage: i32,
    /// Overall score needed for vulnerable
    pub vulnerable_overall: f64,
    /// Overall score needed for warm
    pub warm_overall: f64,
    /// Engagement states that read as negative affect
    pub negative_states: Vec<String>,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            vulnerable_stage: 4,
            vulnerable_overall: 70.0,
            warm_overall: 50.0,
            negative_states: vec![
                "annoyed".to_string(),
                "angry".to_string(),
                "hurt".to_string(),
            ],
        }
    }
}

/// Rule-based mood derivation
pub struct MoodRules {
    config: MoodConfig,
}

impl MoodRules {
    pub fn new(config: Option<MoodConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
        }
    }

    /// Derive the mood for a call. First matching rule wins.
    pub fn derive(&self, stage: i32, engagement_state: &str, overall: f64) -> Mood {
        // Priority 1: earliest stage keeps distance
        if stage <= 1 {
            return Mood::Distant;
        }

        // Priority 2: negative engagement overrides score
        if self
            .config
            .negative_states
            .iter()
            .any(|s| s == engagement_state)
        {
            return Mood::Annoyed;
        }

        // Priority 3: deep stage + high score opens up
        if stage >= self.config.vulnerable_stage && overall >= self.config.vulnerable_overall {
            return Mood::Vulnerable;
        }

        // Priority 4: decent score is warm
        if overall >= self.config.warm_overall {
            return Mood::Warm;
        }

        Mood::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_one_is_distant() {
        let rules = MoodRules::new(None);
        // Even a high score cannot override the stage rule
        assert_eq!(rules.derive(1, "thrilled", 90.0), Mood::Distant);
    }

    #[test]
    fn test_negative_engagement_is_annoyed() {
        let rules = MoodRules::new(None);
        assert_eq!(rules.derive(3, "annoyed", 90.0), Mood::Annoyed);
        assert_eq!(rules.derive(5, "hurt", 90.0), Mood::Annoyed);
    }

    #[test]
    fn test_deep_stage_high_score_is_vulnerable() {
        let rules = MoodRules::new(None);
        assert_eq!(rules.derive(4, "content", 75.0), Mood::Vulnerable);
    }

    #[test]
    fn test_mid_score_is_warm() {
        let rules = MoodRules::new(None);
        assert_eq!(rules.derive(3, "content", 55.0), Mood::Warm);
        // High score but shallow stage stays warm, not vulnerable
        assert_eq!(rules.derive(2, "content", 80.0), Mood::Warm);
    }

    #[test]
    fn test_default_is_neutral() {
        let rules = MoodRules::new(None);
        assert_eq!(rules.derive(2, "content", 20.0), Mood::Neutral);
    }
}
