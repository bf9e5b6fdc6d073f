//! Call Analyzer Port
//!
//! Abstract interface for the conversation scoring service. The
//! analyzer's internal algorithm is a black box; the contract is
//! transcript in, deltas out.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, CallScore, TranscriptEntry, TurnScore};

/// Service interface for conversation scoring
#[async_trait]
pub trait CallAnalyzer: Send + Sync {
    /// Score a full call transcript into one aggregate result
    async fn score_call(
        &self,
        transcript: &[TranscriptEntry],
        duration_seconds: i64,
    ) -> Result<CallScore, DomainError>;

    /// Score a single user/agent exchange for live display during a call
    async fn score_turn(
        &self,
        user_text: &str,
        agent_text: &str,
    ) -> Result<TurnScore, DomainError>;
}
