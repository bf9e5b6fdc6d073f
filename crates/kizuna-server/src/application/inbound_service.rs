//! Inbound Service (Use Case)
//!
//! Admission control for calls the user places to their companion:
//! caller lookup, availability policy, then the same session machinery
//! the outbound path uses.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use kizuna::{
    Availability, AvailabilityPolicy, ContextBuilder, RelationshipScore, SessionRegistry,
    TokenAuthority, UserRepository,
};

use crate::models::{ConnectionBundle, InboundDecision};

/// Fixed rejection for numbers we have never seen. Reveals nothing
/// about who is registered.
const NOT_REGISTERED_MESSAGE: &str =
    "This number is not registered with us. Download the app to meet your companion.";

/// Fallback rejection when a backend is unreachable during admission
const TRY_AGAIN_MESSAGE: &str = "We can't take your call right now. Please try again soon.";

/// Application service for inbound call admission
pub struct InboundService {
    users: Arc<dyn UserRepository>,
    availability: Arc<dyn AvailabilityPolicy>,
    context: Arc<dyn ContextBuilder>,
    tokens: TokenAuthority,
    sessions: Arc<SessionRegistry>,
    agent_id: Option<String>,
}

impl InboundService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        availability: Arc<dyn AvailabilityPolicy>,
        context: Arc<dyn ContextBuilder>,
        tokens: TokenAuthority,
        sessions: Arc<SessionRegistry>,
        agent_id: Option<String>,
    ) -> Self {
        Self {
            users,
            availability,
            context,
            tokens,
            sessions,
            agent_id,
        }
    }

    /// Decide whether to accept a call from this caller. Rejections
    /// carry a fixed message and create no session.
    pub async fn handle_incoming_call(&self, caller_id: &str) -> InboundDecision {
        let user = match self.users.find_by_phone(caller_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!("Inbound call from unregistered number");
                return InboundDecision::rejected(NOT_REGISTERED_MESSAGE);
            }
            Err(e) => {
                tracing::warn!("Caller lookup failed: {}", e);
                return InboundDecision::rejected(TRY_AGAIN_MESSAGE);
            }
        };

        match self.availability.check(&user).await {
            Ok(Availability::Available) => {}
            Ok(Availability::Unavailable { reason }) => {
                tracing::info!("Inbound call from {} rejected by policy", user.id);
                return InboundDecision::rejected(reason);
            }
            Err(e) => {
                tracing::warn!("Availability check failed for {}: {}", user.id, e);
                return InboundDecision::rejected(TRY_AGAIN_MESSAGE);
            }
        }

        let score = match self.users.find_score(user.id).await {
            Ok(score) => score.unwrap_or_else(|| RelationshipScore::new_for_user(user.id)),
            Err(e) => {
                tracing::warn!("Score lookup failed for {}: {}", user.id, e);
                return InboundDecision::rejected(TRY_AGAIN_MESSAGE);
            }
        };

        let context = match self.context.build(&user, &score).await {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!("Context build failed for {}: {}", user.id, e);
                return InboundDecision::rejected(TRY_AGAIN_MESSAGE);
            }
        };

        let session_id = format!("sess_{}_{}", Utc::now().timestamp(), Uuid::new_v4().simple());
        let token = self.tokens.issue(&user.id.to_string(), &session_id);
        self.sessions.create_session(&session_id, user.id).await;

        tracing::info!("Inbound call accepted for user {} (session {})", user.id, session_id);

        InboundDecision::accepted(ConnectionBundle {
            agent_id: self.agent_id.clone(),
            token,
            session_id,
            dynamic_variables: context.dynamic_variables,
            conversation_config_override: context.conversation_config_override,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use kizuna::User;

    fn service(users: InMemoryUsers, policy: Availability) -> InboundService {
        InboundService::new(
            Arc::new(users),
            Arc::new(FixedPolicy(policy)),
            Arc::new(StubContext),
            TokenAuthority::new("test-secret".to_string()),
            Arc::new(SessionRegistry::new()),
            Some("agent_1".to_string()),
        )
    }

    #[tokio::test]
    async fn test_unregistered_caller_rejected_without_session() {
        let service = service(InMemoryUsers::new(), Availability::Available);

        let decision = service.handle_incoming_call("+15559998888").await;

        assert!(!decision.accept_call);
        assert!(decision.message.unwrap().contains("not registered"));
        assert!(decision.bundle.is_none());
        assert_eq!(service.sessions.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_policy_rejection_reason_is_verbatim() {
        let user = User::new("Mira".to_string(), Some("+15550001111".to_string()));
        let service = service(
            InMemoryUsers::new().with_user(user),
            Availability::Unavailable {
                reason: "It's quiet hours right now. Try calling back in the morning.".to_string(),
            },
        );

        let decision = service.handle_incoming_call("+15550001111").await;

        assert!(!decision.accept_call);
        assert_eq!(
            decision.message.as_deref(),
            Some("It's quiet hours right now. Try calling back in the morning.")
        );
        assert_eq!(service.sessions.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_accepted_call_gets_outbound_shaped_bundle() {
        let user = User::new("Mira".to_string(), Some("+15550001111".to_string()));
        let user_id = user.id;
        let service = service(InMemoryUsers::new().with_user(user), Availability::Available);

        let decision = service.handle_incoming_call("+15550001111").await;

        assert!(decision.accept_call);
        let bundle = decision.bundle.unwrap();
        assert_eq!(bundle.agent_id.as_deref(), Some("agent_1"));
        assert_eq!(bundle.dynamic_variables["user_name"], "Mira");

        let tokens = TokenAuthority::new("test-secret".to_string());
        let (token_user, token_session) = tokens.validate(&bundle.token).unwrap();
        assert_eq!(token_user, user_id.to_string());
        assert_eq!(token_session, bundle.session_id);

        assert_eq!(service.sessions.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_to_fixed_rejection() {
        let service = service(InMemoryUsers::failing(), Availability::Available);

        let decision = service.handle_incoming_call("+15550001111").await;

        assert!(!decision.accept_call);
        assert_eq!(decision.message.as_deref(), Some(TRY_AGAIN_MESSAGE));
    }
}
