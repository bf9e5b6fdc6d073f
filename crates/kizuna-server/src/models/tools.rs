//! Tools - In-Call Tool Request/Response Models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use kizuna::ToolName;

/// A tool invocation from an in-progress call
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ToolRequest {
    pub tool_name: String,
    pub user_id: Uuid,
    pub session_id: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Tool response. Business failures are carried in the body; the
/// transport always answers 200 so the live conversation keeps moving.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolResponse {
    pub success: bool,
    pub tool_name: Option<String>,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResponse {
    pub fn ok(tool: ToolName, data: serde_json::Value) -> Self {
        Self {
            success: true,
            tool_name: Some(tool.as_str().to_string()),
            data,
            error: None,
        }
    }

    pub fn error(tool: ToolName, error: impl Into<String>) -> Self {
        Self {
            success: false,
            tool_name: Some(tool.as_str().to_string()),
            data: serde_json::json!({}),
            error: Some(error.into()),
        }
    }

    /// Well-formed failure for a name outside the tool set
    pub fn unknown_tool() -> Self {
        Self {
            success: false,
            tool_name: None,
            data: serde_json::json!({}),
            error: Some("Unknown tool".to_string()),
        }
    }
}
