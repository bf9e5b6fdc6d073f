//! Tool Service (Use Case)
//!
//! Routes in-call tool invocations to capability handlers. The
//! dispatcher itself never fails: every handler error is folded into a
//! well-formed ToolResponse so the live conversation keeps moving.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use kizuna::{
    CallAnalyzer, DomainError, MemoryService, Mood, RelationshipScore, ToolName, UserRepository,
};

use crate::models::{ToolRequest, ToolResponse};
use crate::services::latency::{with_fallback, DEFAULT_TOOL_BUDGET};
use crate::services::mood::MoodRules;

/// Application service for in-call tool dispatch
pub struct ToolService {
    users: Arc<dyn UserRepository>,
    memory: Arc<dyn MemoryService>,
    analyzer: Arc<dyn CallAnalyzer>,
    mood: MoodRules,
    tool_budget: Duration,
}

impl ToolService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        memory: Arc<dyn MemoryService>,
        analyzer: Arc<dyn CallAnalyzer>,
    ) -> Self {
        Self {
            users,
            memory,
            analyzer,
            mood: MoodRules::new(None),
            tool_budget: DEFAULT_TOOL_BUDGET,
        }
    }

    /// Override the per-tool latency budget
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.tool_budget = budget;
        self
    }

    /// Dispatch one tool request. Always returns a well-formed response.
    pub async fn handle(&self, request: ToolRequest) -> ToolResponse {
        let Ok(tool) = request.tool_name.parse::<ToolName>() else {
            tracing::warn!("Unknown tool requested: {}", request.tool_name);
            return ToolResponse::unknown_tool();
        };

        let result = match tool {
            ToolName::GetContext => self.get_context(&request).await,
            ToolName::GetMemory => self.get_memory(&request).await,
            ToolName::ScoreTurn => self.score_turn(&request).await,
            ToolName::UpdateMemory => self.update_memory(&request).await,
        };

        match result {
            Ok(data) => ToolResponse::ok(tool, data),
            Err(e) => {
                tracing::warn!("Tool {} failed for session {}: {}", tool, request.session_id, e);
                ToolResponse::error(tool, e.to_string())
            }
        }
    }

    /// Subject snapshot with a derived mood, under the latency budget.
    /// On deadline the conversation gets a neutral snapshot instead of
    /// a stall.
    async fn get_context(&self, request: &ToolRequest) -> Result<Value, DomainError> {
        let fallback = json!({
            "mood": Mood::Neutral.as_str(),
            "stage": Value::Null,
            "engagement": Value::Null,
            "relationship": Value::Null,
            "traits": {},
        });

        with_fallback(self.tool_budget, fallback, "get_context", async {
            let user = self
                .users
                .find_by_id(request.user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("User", request.user_id))?;

            let score = self
                .users
                .find_score(request.user_id)
                .await?
                .unwrap_or_else(|| RelationshipScore::new_for_user(request.user_id));

            let mood = self
                .mood
                .derive(user.stage, &user.engagement_state, score.overall());

            Ok(json!({
                "mood": mood.as_str(),
                "stage": user.stage,
                "engagement": user.engagement_state,
                "relationship": {
                    "overall": score.overall(),
                    "intimacy": score.intimacy,
                    "passion": score.passion,
                    "trust": score.trust,
                    "secureness": score.secureness,
                },
                "traits": user.trait_prefs,
            }))
        })
        .await
    }

    /// Semantic recall. Backend failure degrades to an empty result set
    /// with an error string instead of propagating.
    async fn get_memory(&self, request: &ToolRequest) -> Result<Value, DomainError> {
        let query = request
            .data
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let limit = request
            .data
            .get("limit")
            .and_then(Value::as_u64)
            .unwrap_or(5) as usize;

        match self.memory.search(request.user_id, query, limit).await {
            Ok(memories) => Ok(json!({ "memories": memories })),
            Err(e) => {
                tracing::warn!("Memory search failed for {}: {}", request.user_id, e);
                Ok(json!({ "memories": [], "error": e.to_string() }))
            }
        }
    }

    /// Single-exchange scoring for live display, independent of the
    /// end-of-call aggregate.
    async fn score_turn(&self, request: &ToolRequest) -> Result<Value, DomainError> {
        let user_text = request
            .data
            .get("user_message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let agent_text = request
            .data
            .get("agent_message")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let turn = self.analyzer.score_turn(user_text, agent_text).await?;
        Ok(json!({ "deltas": turn.deltas, "comment": turn.comment }))
    }

    /// Store one fact with a category tag
    async fn update_memory(&self, request: &ToolRequest) -> Result<Value, DomainError> {
        let content = request
            .data
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::Validation("content is required".to_string()))?;
        let category = request
            .data
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or("general");

        match self.memory.store(request.user_id, content, category).await {
            Ok(()) => Ok(json!({ "stored": true, "category": category })),
            Err(e) => Ok(json!({ "stored": false, "error": e.to_string() })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use kizuna::{MemoryHit, ScoreDeltas, User};
    use uuid::Uuid;

    fn request(tool_name: &str, user_id: Uuid, data: Value) -> ToolRequest {
        ToolRequest {
            tool_name: tool_name.to_string(),
            user_id,
            session_id: "sess_test".to_string(),
            data,
        }
    }

    fn stage_user(stage: i32, engagement: &str) -> User {
        let mut user = User::new("Mira".to_string(), None);
        user.stage = stage;
        user.engagement_state = engagement.to_string();
        user
    }

    fn service_with(users: InMemoryUsers, memory: StubMemory) -> ToolService {
        ToolService::new(
            Arc::new(users),
            Arc::new(memory),
            Arc::new(StubAnalyzer::new(ScoreDeltas {
                intimacy: 0.5,
                passion: 0.0,
                trust: 0.5,
                secureness: 0.0,
            })),
        )
    }

    #[tokio::test]
    async fn test_unknown_tool_returns_well_formed_failure() {
        let service = service_with(InMemoryUsers::new(), StubMemory::default());

        let response = service
            .handle(request("open_pod_bay_doors", Uuid::new_v4(), json!({})))
            .await;

        assert!(!response.success);
        assert!(response.tool_name.is_none());
        assert_eq!(response.error.as_deref(), Some("Unknown tool"));
    }

    #[tokio::test]
    async fn test_get_context_derives_mood() {
        let user = stage_user(1, "neutral");
        let user_id = user.id;
        let service = service_with(InMemoryUsers::new().with_user(user), StubMemory::default());

        let response = service
            .handle(request("get_context", user_id, json!({})))
            .await;

        assert!(response.success);
        assert_eq!(response.data["mood"], "distant");
        assert_eq!(response.data["stage"], 1);
    }

    #[tokio::test]
    async fn test_get_context_handler_failure_is_captured() {
        let service = service_with(InMemoryUsers::failing(), StubMemory::default());

        let response = service
            .handle(request("get_context", Uuid::new_v4(), json!({})))
            .await;

        assert!(!response.success);
        assert_eq!(response.tool_name.as_deref(), Some("get_context"));
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_get_context_over_budget_serves_fallback() {
        let user = stage_user(3, "content");
        let user_id = user.id;
        let users = InMemoryUsers::new()
            .with_user(user)
            .with_lookup_delay(Duration::from_millis(100));
        let service =
            service_with(users, StubMemory::default()).with_budget(Duration::from_millis(10));

        let response = service
            .handle(request("get_context", user_id, json!({})))
            .await;

        assert!(response.success);
        assert_eq!(response.data["timeout"], true);
        assert_eq!(response.data["cache_friendly"], true);
        assert_eq!(response.data["mood"], "neutral");
    }

    #[tokio::test]
    async fn test_get_memory_returns_hits() {
        let user = stage_user(2, "content");
        let user_id = user.id;
        let memory = StubMemory::with_hits(vec![MemoryHit {
            content: "loves jazz".to_string(),
            category: "preferences".to_string(),
            similarity: 0.92,
        }]);
        let service = service_with(InMemoryUsers::new().with_user(user), memory);

        let response = service
            .handle(request("get_memory", user_id, json!({"query": "music"})))
            .await;

        assert!(response.success);
        assert_eq!(response.data["memories"][0]["content"], "loves jazz");
    }

    #[tokio::test]
    async fn test_get_memory_degrades_to_empty_on_backend_failure() {
        let service = service_with(InMemoryUsers::new(), StubMemory::failing());

        let response = service
            .handle(request("get_memory", Uuid::new_v4(), json!({"query": "music"})))
            .await;

        assert!(response.success);
        assert_eq!(response.data["memories"].as_array().unwrap().len(), 0);
        assert!(response.data["error"].as_str().unwrap().contains("memory down"));
    }

    #[tokio::test]
    async fn test_score_turn_reports_deltas() {
        let response = service_with(InMemoryUsers::new(), StubMemory::default())
            .handle(request(
                "score_turn",
                Uuid::new_v4(),
                json!({"user_message": "I trust you", "agent_message": "That means a lot"}),
            ))
            .await;

        assert!(response.success);
        assert_eq!(response.data["deltas"]["trust"], 0.5);
        assert_eq!(response.data["comment"], "good exchange");
    }

    #[tokio::test]
    async fn test_update_memory_stores_with_category() {
        let memory = Arc::new(StubMemory::default());
        let user_id = Uuid::new_v4();
        let service = ToolService::new(
            Arc::new(InMemoryUsers::new()),
            memory.clone(),
            Arc::new(StubAnalyzer::new(ScoreDeltas::zero())),
        );

        let response = service
            .handle(request(
                "update_memory",
                user_id,
                json!({"content": "has a cat named Sable", "category": "pets"}),
            ))
            .await;

        assert!(response.success);
        assert_eq!(response.data["stored"], true);
        assert_eq!(response.data["category"], "pets");
        assert_eq!(
            memory.stored(),
            vec![(user_id, "has a cat named Sable".to_string(), "pets".to_string())]
        );
    }

    #[tokio::test]
    async fn test_update_memory_backend_failure_reports_not_stored() {
        let response = service_with(InMemoryUsers::new(), StubMemory::failing())
            .handle(request(
                "update_memory",
                Uuid::new_v4(),
                json!({"content": "anything"}),
            ))
            .await;

        assert!(response.success);
        assert_eq!(response.data["stored"], false);
        assert!(response.data["error"].is_string());
    }

    #[tokio::test]
    async fn test_update_memory_without_content_is_captured_error() {
        let response = service_with(InMemoryUsers::new(), StubMemory::default())
            .handle(request("update_memory", Uuid::new_v4(), json!({})))
            .await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("content"));
    }
}
