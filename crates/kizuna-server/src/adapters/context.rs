//! Context Builder
//!
//! Assembles the per-call connection context from user and score state.
//! Persona tone and prompt text are produced by the persona layer; this
//! adapter only carries the structured variables the platform expects.

use async_trait::async_trait;

use kizuna::{CallContext, ContextBuilder, DomainError, RelationshipScore, User};

/// ContextBuilder backed by the user's stored profile
pub struct ProfileContextBuilder {
    language: String,
}

impl ProfileContextBuilder {
    pub fn new(language: Option<String>) -> Self {
        Self {
            language: language.unwrap_or_else(|| "en".to_string()),
        }
    }
}

#[async_trait]
impl ContextBuilder for ProfileContextBuilder {
    async fn build(
        &self,
        user: &User,
        score: &RelationshipScore,
    ) -> Result<CallContext, DomainError> {
        let dynamic_variables = serde_json::json!({
            "user_name": user.name,
            "stage": user.stage,
            "engagement": user.engagement_state,
            "relationship_overall": score.overall(),
            "intimacy": score.intimacy,
            "passion": score.passion,
            "trust": score.trust,
            "secureness": score.secureness,
            "traits": user.trait_prefs,
        });

        let conversation_config_override = serde_json::json!({
            "agent": {
                "language": self.language,
            },
        });

        Ok(CallContext {
            dynamic_variables,
            conversation_config_override,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_carries_profile_and_score() {
        let builder = ProfileContextBuilder::new(None);
        let user = User::new("Mira".to_string(), None);
        let score = RelationshipScore::new_for_user(user.id);

        let context = builder.build(&user, &score).await.unwrap();

        assert_eq!(context.dynamic_variables["user_name"], "Mira");
        assert_eq!(context.dynamic_variables["stage"], 1);
        assert!(context.conversation_config_override["agent"]["language"].is_string());
    }
}
