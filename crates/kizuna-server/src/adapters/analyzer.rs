//! Call Analyzer Client
//!
//! HTTP adapter for the conversation scoring collaborator. The scoring
//! algorithm itself is a black box behind a JSON contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use kizuna::{
    CallAnalyzer, CallScore, DomainError, ScoreDeltas, TranscriptEntry, TurnScore,
};

/// HTTP implementation of CallAnalyzer
pub struct HttpCallAnalyzer {
    client: Client,
    base_url: String,
}

impl HttpCallAnalyzer {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }
}

#[derive(Deserialize)]
struct CallScoreResponse {
    deltas: ScoreDeltas,
    explanation: String,
    #[serde(default)]
    behaviors_identified: Vec<String>,
    #[serde(default)]
    confidence: f64,
}

#[derive(Deserialize)]
struct TurnScoreResponse {
    deltas: ScoreDeltas,
    #[serde(default)]
    comment: String,
}

#[async_trait]
impl CallAnalyzer for HttpCallAnalyzer {
    async fn score_call(
        &self,
        transcript: &[TranscriptEntry],
        duration_seconds: i64,
    ) -> Result<CallScore, DomainError> {
        let response = self
            .client
            .post(format!("{}/analyze/call", self.base_url))
            .json(&json!({
                "transcript": transcript,
                "duration_seconds": duration_seconds,
            }))
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Analyzer unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ExternalService(format!(
                "Analyzer returned {}",
                status.as_u16()
            )));
        }

        let parsed: CallScoreResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid analyzer response: {e}")))?;

        Ok(CallScore {
            // Session id is stamped by the aggregator
            session_id: String::new(),
            deltas: parsed.deltas,
            explanation: parsed.explanation,
            duration_seconds,
            behaviors_identified: parsed.behaviors_identified,
            confidence: parsed.confidence,
        })
    }

    async fn score_turn(
        &self,
        user_text: &str,
        agent_text: &str,
    ) -> Result<TurnScore, DomainError> {
        let response = self
            .client
            .post(format!("{}/analyze/turn", self.base_url))
            .json(&json!({
                "user_text": user_text,
                "agent_text": agent_text,
            }))
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Analyzer unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ExternalService(format!(
                "Analyzer returned {}",
                status.as_u16()
            )));
        }

        let parsed: TurnScoreResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid analyzer response: {e}")))?;

        Ok(TurnScore {
            deltas: parsed.deltas,
            comment: parsed.comment,
        })
    }
}
