//! Calling Platform Client
//!
//! HTTP adapter for the remote conversational-AI platform's outbound
//! dialing API. Remote failures, including non-2xx responses, come back
//! as structured errors so a failed dial can never take the server down.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use kizuna::{CallContext, CallingPlatform, DomainError, OutboundCallInfo};

/// HTTP implementation of CallingPlatform
pub struct PlatformClient {
    client: Client,
    base_url: String,
    api_key: String,
    agent_id: String,
}

impl PlatformClient {
    pub fn new(base_url: String, api_key: String, agent_id: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            api_key,
            agent_id,
        }
    }
}

#[async_trait]
impl CallingPlatform for PlatformClient {
    async fn start_outbound_call(
        &self,
        phone_number: &str,
        session_id: &str,
        token: &str,
        context: &CallContext,
    ) -> Result<OutboundCallInfo, DomainError> {
        let body = json!({
            "agent_id": self.agent_id,
            "to_number": phone_number,
            "conversation_initiation_client_data": {
                "type": "conversation_initiation_client_data",
                "dynamic_variables": context.dynamic_variables,
                "conversation_config_override": context.conversation_config_override,
            },
            "metadata": {
                "session_id": session_id,
                "token": token,
            },
        });

        let response = self
            .client
            .post(format!("{}/v1/convai/outbound-call", self.base_url))
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Outbound call failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "Outbound call rejected ({}): {}",
                status.as_u16(),
                detail
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid platform response: {e}")))?;

        let call_id = payload
            .get("call_id")
            .or_else(|| payload.get("callSid"))
            .and_then(|v| v.as_str())
            .unwrap_or(session_id)
            .to_string();

        Ok(OutboundCallInfo { call_id })
    }
}
