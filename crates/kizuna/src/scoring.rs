//! Score Aggregation
//!
//! Converts a full call transcript into one aggregate score. An empty
//! transcript short-circuits to a neutral score without invoking the
//! analyzer at all.

use std::sync::Arc;

use crate::domain::{errors::DomainError, CallScore, TranscriptEntry};
use crate::ports::CallAnalyzer;

/// Aggregates one finished call into a single CallScore
pub struct ScoreAggregator {
    analyzer: Arc<dyn CallAnalyzer>,
}

impl ScoreAggregator {
    pub fn new(analyzer: Arc<dyn CallAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Score a finished call. Analyzer failures surface as
    /// `DomainError::ExternalService`; the caller decides how to degrade.
    pub async fn score_call(
        &self,
        session_id: &str,
        transcript: &[TranscriptEntry],
        duration_seconds: i64,
    ) -> Result<CallScore, DomainError> {
        if transcript.is_empty() {
            return Ok(CallScore::empty(session_id.to_string(), duration_seconds));
        }

        let mut score = self.analyzer.score_call(transcript, duration_seconds).await?;
        score.session_id = session_id.to_string();
        score.duration_seconds = duration_seconds;
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScoreDeltas, TurnScore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Analyzer fake that counts invocations
    struct CountingAnalyzer {
        calls: AtomicUsize,
    }

    impl CountingAnalyzer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CallAnalyzer for CountingAnalyzer {
        async fn score_call(
            &self,
            _transcript: &[TranscriptEntry],
            duration_seconds: i64,
        ) -> Result<CallScore, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CallScore {
                session_id: String::new(),
                deltas: ScoreDeltas {
                    intimacy: 1.5,
                    passion: 0.5,
                    trust: 1.0,
                    secureness: -0.5,
                },
                explanation: "warm conversation".to_string(),
                duration_seconds,
                behaviors_identified: vec!["shared a secret".to_string()],
                confidence: 0.8,
            })
        }

        async fn score_turn(
            &self,
            _user_text: &str,
            _agent_text: &str,
        ) -> Result<TurnScore, DomainError> {
            unreachable!("aggregate scoring never scores single turns")
        }
    }

    #[tokio::test]
    async fn test_empty_transcript_scores_zero_without_analyzer() {
        let analyzer = Arc::new(CountingAnalyzer::new());
        let aggregator = ScoreAggregator::new(analyzer.clone());

        let score = aggregator.score_call("sess_1", &[], 42).await.unwrap();

        assert!(score.deltas.is_zero());
        assert_eq!(score.confidence, 0.0);
        assert_eq!(score.duration_seconds, 42);
        assert!(score.behaviors_identified.is_empty());
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transcript_delegates_to_analyzer() {
        let analyzer = Arc::new(CountingAnalyzer::new());
        let aggregator = ScoreAggregator::new(analyzer.clone());

        let transcript = vec![
            TranscriptEntry::user("hey, how was your day?"),
            TranscriptEntry::agent("better now that you called"),
        ];
        let score = aggregator
            .score_call("sess_1", &transcript, 120)
            .await
            .unwrap();

        assert_eq!(score.session_id, "sess_1");
        assert_eq!(score.deltas.intimacy, 1.5);
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
    }
}
