//! Inbound - Pre-Call Decision Models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::call::ConnectionBundle;

/// Pre-call lookup sent by the platform when someone dials in
#[derive(Debug, Deserialize, ToSchema)]
pub struct InboundCallRequest {
    pub caller_id: String,
}

/// Internal decision for an inbound call
#[derive(Debug)]
pub struct InboundDecision {
    pub accept_call: bool,
    pub message: Option<String>,
    pub bundle: Option<ConnectionBundle>,
}

impl InboundDecision {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            accept_call: false,
            message: Some(message.into()),
            bundle: None,
        }
    }

    pub fn accepted(bundle: ConnectionBundle) -> Self {
        Self {
            accept_call: true,
            message: None,
            bundle: Some(bundle),
        }
    }
}

/// Wire response for the pre-call hook. The platform requires
/// `dynamic_variables` and `conversation_config_override` on every
/// response, including rejections, so both are always present.
#[derive(Debug, Serialize, ToSchema)]
pub struct InboundCallResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub accept_call: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[schema(value_type = Object)]
    pub dynamic_variables: serde_json::Value,
    #[schema(value_type = Object)]
    pub conversation_config_override: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl From<InboundDecision> for InboundCallResponse {
    fn from(decision: InboundDecision) -> Self {
        match decision.bundle {
            Some(bundle) => Self {
                kind: "conversation_initiation_client_data".to_string(),
                accept_call: decision.accept_call,
                message: decision.message,
                dynamic_variables: bundle.dynamic_variables,
                conversation_config_override: bundle.conversation_config_override,
                agent_id: bundle.agent_id,
                token: Some(bundle.token),
                session_id: Some(bundle.session_id),
            },
            None => Self {
                kind: "conversation_initiation_client_data".to_string(),
                accept_call: decision.accept_call,
                message: decision.message,
                dynamic_variables: serde_json::json!({}),
                conversation_config_override: serde_json::json!({}),
                agent_id: None,
                token: None,
                session_id: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_platform_keys_non_null() {
        let response: InboundCallResponse =
            InboundDecision::rejected("This number is not registered with us.").into();

        let json = serde_json::to_value(&response).unwrap();
        assert!(json["dynamic_variables"].is_object());
        assert!(json["conversation_config_override"].is_object());
        assert_eq!(json["type"], "conversation_initiation_client_data");
        assert_eq!(json["accept_call"], false);
    }
}
