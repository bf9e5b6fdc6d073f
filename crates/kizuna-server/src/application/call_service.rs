//! Call Service (Use Case)
//!
//! Top-level driver for outbound call initiation and call settlement.
//! Composes the token authority, session registry, and score
//! aggregator over the repository and service ports.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use kizuna::{
    CallContext, CallLogRepository, CallingPlatform, ContextBuilder, DomainError,
    RelationshipScore, ScoreAggregator, ScoreDeltas, ScoreHistoryEvent, ScoreHistoryRepository,
    SessionRegistry, TokenAuthority, TranscriptEntry, User, UserRepository,
};

use crate::models::{ConnectionBundle, EndCallOutcome, OutboundCallResult};

/// Application service for call lifecycle operations
pub struct CallService {
    users: Arc<dyn UserRepository>,
    history: Arc<dyn ScoreHistoryRepository>,
    call_logs: Arc<dyn CallLogRepository>,
    context: Arc<dyn ContextBuilder>,
    platform: Option<Arc<dyn CallingPlatform>>,
    tokens: TokenAuthority,
    sessions: Arc<SessionRegistry>,
    aggregator: ScoreAggregator,
    agent_id: Option<String>,
}

impl CallService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        history: Arc<dyn ScoreHistoryRepository>,
        call_logs: Arc<dyn CallLogRepository>,
        context: Arc<dyn ContextBuilder>,
        platform: Option<Arc<dyn CallingPlatform>>,
        tokens: TokenAuthority,
        sessions: Arc<SessionRegistry>,
        aggregator: ScoreAggregator,
        agent_id: Option<String>,
    ) -> Self {
        Self {
            users,
            history,
            call_logs,
            context,
            platform,
            tokens,
            sessions,
            aggregator,
            agent_id,
        }
    }

    /// Prepare a call: load state, mint a session and token, and return
    /// the connection bundle the platform needs.
    pub async fn initiate_call(&self, user_id: Uuid) -> Result<ConnectionBundle, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        if !user.active {
            return Err(DomainError::NotAvailable(
                "This user cannot receive calls right now".to_string(),
            ));
        }

        let score = self
            .users
            .find_score(user_id)
            .await?
            .unwrap_or_else(|| RelationshipScore::new_for_user(user_id));

        let context = self.context.build(&user, &score).await?;
        let session_id = new_session_id();
        let token = self.tokens.issue(&user.id.to_string(), &session_id);

        self.sessions.create_session(&session_id, user.id).await;
        self.record_call_start(user.id, &session_id);

        tracing::info!("Call initiated for user {} (session {})", user.id, session_id);

        Ok(ConnectionBundle {
            agent_id: self.agent_id.clone(),
            token,
            session_id,
            dynamic_variables: context.dynamic_variables,
            conversation_config_override: context.conversation_config_override,
        })
    }

    /// Settle a finished call: score the transcript, apply deltas, write
    /// the audit record, and finalize the session. Never returns an
    /// error; every failure becomes a structured outcome.
    pub async fn end_call(
        &self,
        user_id: Uuid,
        session_id: &str,
        transcript: &[TranscriptEntry],
        duration_seconds: i64,
    ) -> EndCallOutcome {
        let user = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.sessions.finalize_session(session_id).await;
                return EndCallOutcome::failed(session_id, "User not found");
            }
            Err(e) => {
                tracing::warn!("User lookup failed while ending call {}: {}", session_id, e);
                self.sessions.finalize_session(session_id).await;
                return EndCallOutcome::failed(session_id, e.to_string());
            }
        };

        let settled = self
            .settle(&user, session_id, transcript, duration_seconds)
            .await;

        // The session ends regardless of how settlement went
        self.sessions.finalize_session(session_id).await;

        match settled {
            Ok((new_score, deltas)) => EndCallOutcome::settled(session_id, new_score, deltas),
            Err(e) => {
                tracing::warn!("Failed to settle call {}: {}", session_id, e);
                EndCallOutcome::failed(session_id, e.to_string())
            }
        }
    }

    /// Place an outbound phone call through the calling platform.
    /// Platform failures come back as `success: false`, never an error.
    pub async fn make_outbound_call(
        &self,
        user_id: Uuid,
        phone_number: &str,
    ) -> OutboundCallResult {
        let Some(platform) = self.platform.clone() else {
            return OutboundCallResult::failed(
                "Outbound calling is not configured",
                "platform_disabled",
            );
        };

        let bundle = match self.initiate_call(user_id).await {
            Ok(bundle) => bundle,
            Err(e) => {
                return OutboundCallResult::failed("Could not prepare the call", e.to_string())
            }
        };

        let context = CallContext {
            dynamic_variables: bundle.dynamic_variables.clone(),
            conversation_config_override: bundle.conversation_config_override.clone(),
        };

        match platform
            .start_outbound_call(phone_number, &bundle.session_id, &bundle.token, &context)
            .await
        {
            Ok(info) => OutboundCallResult::placed(info.call_id),
            Err(e) => {
                tracing::warn!("Outbound dial failed for session {}: {}", bundle.session_id, e);
                self.sessions.finalize_session(&bundle.session_id).await;
                OutboundCallResult::failed("The call could not be placed", e.to_string())
            }
        }
    }

    async fn settle(
        &self,
        user: &User,
        session_id: &str,
        transcript: &[TranscriptEntry],
        duration_seconds: i64,
    ) -> Result<(f64, ScoreDeltas), DomainError> {
        let call_score = self
            .aggregator
            .score_call(session_id, transcript, duration_seconds)
            .await?;

        let mut score = self
            .users
            .find_score(user.id)
            .await?
            .unwrap_or_else(|| RelationshipScore::new_for_user(user.id));

        let old_overall = score.overall();
        score.apply(&call_score.deltas);
        let saved = self.users.save_score(&score).await?;
        let new_overall = saved.overall();

        let event = ScoreHistoryEvent::voice_call(user.id, old_overall, new_overall, &call_score);
        self.history.append(&event).await?;
        self.users.touch_last_interaction(user.id).await?;

        tracing::info!(
            "Call {} settled for user {}: {:.1} -> {:.1}",
            session_id,
            user.id,
            old_overall,
            new_overall
        );

        Ok((new_overall, call_score.deltas))
    }

    /// Audit record on a detached task: a logging-backend failure is
    /// logged and contained, never blocking the call being started.
    fn record_call_start(&self, user_id: Uuid, session_id: &str) {
        let call_logs = self.call_logs.clone();
        let session_id = session_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = call_logs.record_start(user_id, &session_id).await {
                tracing::warn!("Failed to record call start for {}: {}", session_id, e);
            }
        });
    }
}

fn new_session_id() -> String {
    format!("sess_{}_{}", Utc::now().timestamp(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use kizuna::{SessionState, TranscriptEntry};

    fn service(
        users: Arc<InMemoryUsers>,
        history: Arc<RecordingHistory>,
        analyzer: Arc<StubAnalyzer>,
        platform: Option<Arc<dyn CallingPlatform>>,
    ) -> CallService {
        CallService::new(
            users,
            history,
            Arc::new(RecordingCallLogs::new()),
            Arc::new(StubContext),
            platform,
            TokenAuthority::new("test-secret".to_string()),
            Arc::new(SessionRegistry::new()),
            ScoreAggregator::new(analyzer),
            Some("agent_1".to_string()),
        )
    }

    fn sample_deltas() -> ScoreDeltas {
        ScoreDeltas {
            intimacy: 2.0,
            passion: 1.0,
            trust: 3.0,
            secureness: -1.0,
        }
    }

    #[tokio::test]
    async fn test_initiate_call_issues_bound_token_and_session() {
        let user = User::new("Mira".to_string(), None);
        let user_id = user.id;
        let users = Arc::new(InMemoryUsers::new().with_user(user));
        let analyzer = Arc::new(StubAnalyzer::new(sample_deltas()));
        let service = service(users, Arc::new(RecordingHistory::new()), analyzer, None);

        let bundle = service.initiate_call(user_id).await.unwrap();

        let tokens = TokenAuthority::new("test-secret".to_string());
        let (token_user, token_session) = tokens.validate(&bundle.token).unwrap();
        assert_eq!(token_user, user_id.to_string());
        assert_eq!(token_session, bundle.session_id);

        let session = service.sessions.get(&bundle.session_id).await.unwrap();
        assert_eq!(session.state, SessionState::Active);
        assert_eq!(bundle.dynamic_variables["user_name"], "Mira");
    }

    #[tokio::test]
    async fn test_initiate_call_records_start_on_detached_task() {
        let user = User::new("Mira".to_string(), None);
        let user_id = user.id;
        let users = Arc::new(InMemoryUsers::new().with_user(user));
        let call_logs = Arc::new(RecordingCallLogs::new());
        let service = CallService::new(
            users,
            Arc::new(RecordingHistory::new()),
            call_logs.clone(),
            Arc::new(StubContext),
            None,
            TokenAuthority::new("test-secret".to_string()),
            Arc::new(SessionRegistry::new()),
            ScoreAggregator::new(Arc::new(StubAnalyzer::new(sample_deltas()))),
            None,
        );

        let bundle = service.initiate_call(user_id).await.unwrap();

        // The audit record lands on a spawned task; give it a beat
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(call_logs.starts(), vec![(user_id, bundle.session_id)]);
    }

    #[tokio::test]
    async fn test_initiate_call_unknown_user_is_not_found() {
        let users = Arc::new(InMemoryUsers::new());
        let analyzer = Arc::new(StubAnalyzer::new(sample_deltas()));
        let service = service(users, Arc::new(RecordingHistory::new()), analyzer, None);

        let err = service.initiate_call(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_initiate_call_inactive_user_is_not_available() {
        let mut user = User::new("Mira".to_string(), None);
        user.active = false;
        let user_id = user.id;
        let users = Arc::new(InMemoryUsers::new().with_user(user));
        let analyzer = Arc::new(StubAnalyzer::new(sample_deltas()));
        let service = service(users, Arc::new(RecordingHistory::new()), analyzer, None);

        let err = service.initiate_call(user_id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotAvailable(_)));
    }

    #[tokio::test]
    async fn test_end_call_unknown_user_returns_structured_failure() {
        let users = Arc::new(InMemoryUsers::new());
        let analyzer = Arc::new(StubAnalyzer::new(sample_deltas()));
        let service = service(users, Arc::new(RecordingHistory::new()), analyzer, None);

        let outcome = service
            .end_call(Uuid::new_v4(), "sess_x", &[], 60)
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("User not found"));
    }

    #[tokio::test]
    async fn test_end_call_applies_deltas_and_appends_history() {
        let user = User::new("Mira".to_string(), None);
        let user_id = user.id;
        let users = Arc::new(
            InMemoryUsers::new()
                .with_user(user)
                .with_score(RelationshipScore::new_for_user(user_id)),
        );
        let history = Arc::new(RecordingHistory::new());
        let analyzer = Arc::new(StubAnalyzer::new(sample_deltas()));
        let service = service(users.clone(), history.clone(), analyzer, None);

        let bundle = service.initiate_call(user_id).await.unwrap();
        let transcript = vec![
            TranscriptEntry::user("I missed you today"),
            TranscriptEntry::agent("Tell me everything"),
        ];
        let outcome = service
            .end_call(user_id, &bundle.session_id, &transcript, 180)
            .await;

        assert!(outcome.success);
        // Initial score is 10 across the board; mean delta is +1.25
        assert_eq!(outcome.new_score, Some(11.25));

        let score = users.score_of(user_id).unwrap();
        assert_eq!(score.intimacy, 12.0);
        assert_eq!(score.secureness, 9.0);

        let events = history.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "voice_call");
        assert_eq!(events[0].old_score, 10.0);
        assert_eq!(events[0].new_score, 11.25);
        assert_eq!(events[0].session_id, bundle.session_id);

        let session = service.sessions.get(&bundle.session_id).await.unwrap();
        assert_eq!(session.state, SessionState::Finalized);
    }

    #[tokio::test]
    async fn test_end_call_empty_transcript_skips_analyzer() {
        let user = User::new("Mira".to_string(), None);
        let user_id = user.id;
        let users = Arc::new(InMemoryUsers::new().with_user(user));
        let analyzer = Arc::new(StubAnalyzer::new(sample_deltas()));
        let service = service(
            users.clone(),
            Arc::new(RecordingHistory::new()),
            analyzer.clone(),
            None,
        );

        let outcome = service.end_call(user_id, "sess_empty", &[], 5).await;

        assert!(outcome.success);
        assert_eq!(outcome.new_score, Some(10.0));
        assert!(outcome.deltas.unwrap().is_zero());
        assert_eq!(analyzer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_end_call_analyzer_failure_degrades() {
        let user = User::new("Mira".to_string(), None);
        let user_id = user.id;
        let users = Arc::new(InMemoryUsers::new().with_user(user));
        let analyzer = Arc::new(StubAnalyzer::failing());
        let service = service(users, Arc::new(RecordingHistory::new()), analyzer, None);

        let transcript = vec![TranscriptEntry::user("hello?")];
        let outcome = service
            .end_call(user_id, "sess_1", &transcript, 30)
            .await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("analyzer down"));
    }

    #[tokio::test]
    async fn test_outbound_call_platform_rejection_is_structured() {
        let user = User::new("Mira".to_string(), Some("+15550001111".to_string()));
        let user_id = user.id;
        let users = Arc::new(InMemoryUsers::new().with_user(user));
        let analyzer = Arc::new(StubAnalyzer::new(sample_deltas()));
        let service = service(
            users,
            Arc::new(RecordingHistory::new()),
            analyzer,
            Some(Arc::new(StubPlatform::failing())),
        );

        let result = service.make_outbound_call(user_id, "+15550001111").await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("402"));
    }

    #[tokio::test]
    async fn test_outbound_call_places_through_platform() {
        let user = User::new("Mira".to_string(), Some("+15550001111".to_string()));
        let user_id = user.id;
        let users = Arc::new(InMemoryUsers::new().with_user(user));
        let analyzer = Arc::new(StubAnalyzer::new(sample_deltas()));
        let service = service(
            users,
            Arc::new(RecordingHistory::new()),
            analyzer,
            Some(Arc::new(StubPlatform::new())),
        );

        let result = service.make_outbound_call(user_id, "+15550001111").await;

        assert!(result.success);
        assert!(result.call_id.unwrap().starts_with("call_sess_"));
    }
}
