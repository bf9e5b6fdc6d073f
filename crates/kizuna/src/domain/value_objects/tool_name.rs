//! ToolName - The closed set of in-call tools
//!
//! Dispatch over this enum is exhaustive at compile time; the only
//! "unknown tool" path is the string parse at the request boundary.

use serde::{Deserialize, Serialize};

/// In-call tool capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetContext,
    GetMemory,
    ScoreTurn,
    UpdateMemory,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GetContext => "get_context",
            ToolName::GetMemory => "get_memory",
            ToolName::ScoreTurn => "score_turn",
            ToolName::UpdateMemory => "update_memory",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get_context" => Ok(ToolName::GetContext),
            "get_memory" => Ok(ToolName::GetMemory),
            "score_turn" => Ok(ToolName::ScoreTurn),
            "update_memory" => Ok(ToolName::UpdateMemory),
            _ => Err(format!("Unknown tool: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip() {
        for name in [
            ToolName::GetContext,
            ToolName::GetMemory,
            ToolName::ScoreTurn,
            ToolName::UpdateMemory,
        ] {
            assert_eq!(ToolName::from_str(name.as_str()), Ok(name));
        }
    }

    #[test]
    fn test_unknown_tool_fails_parse() {
        assert!(ToolName::from_str("delete_everything").is_err());
    }
}
