//! Kizuna API Client

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Kizuna
pub struct KizunaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Serialize)]
pub struct InitiateCallRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionBundle {
    pub agent_id: Option<String>,
    pub token: String,
    pub session_id: String,
    pub dynamic_variables: serde_json::Value,
    pub conversation_config_override: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct OutboundCallRequest {
    pub user_id: Uuid,
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct OutboundCallResult {
    pub success: bool,
    pub message: String,
    pub call_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreHistoryResponse {
    pub event_type: String,
    pub old_score: f64,
    pub new_score: f64,
    pub session_id: String,
    pub duration_seconds: i64,
    pub explanation: String,
    pub created_at: String,
}

impl KizunaClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Prepare a call and return the connection bundle
    pub async fn initiate_call(&self, user_id: Uuid) -> Result<ConnectionBundle> {
        let url = format!("{}/kizuna/calls", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&InitiateCallRequest { user_id })
            .send()
            .await
            .context("Failed to connect to Kizuna API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let bundle: ConnectionBundle = resp.json().await.context("Failed to parse response")?;

        Ok(bundle)
    }

    /// Place an outbound phone call
    pub async fn outbound_call(
        &self,
        user_id: Uuid,
        phone_number: &str,
    ) -> Result<OutboundCallResult> {
        let url = format!("{}/kizuna/calls/outbound", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&OutboundCallRequest {
                user_id,
                phone_number: phone_number.to_string(),
            })
            .send()
            .await
            .context("Failed to connect to Kizuna API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let result: OutboundCallResult = resp.json().await.context("Failed to parse response")?;

        Ok(result)
    }

    /// Score history for a user, newest first
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<ScoreHistoryResponse>> {
        let url = format!("{}/kizuna/users/{}/history", self.base_url, user_id);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .context("Failed to connect to Kizuna API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let events: Vec<ScoreHistoryResponse> =
            resp.json().await.context("Failed to parse response")?;

        Ok(events)
    }
}
