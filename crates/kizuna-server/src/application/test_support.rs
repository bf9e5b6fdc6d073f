//! Hand-rolled port fakes shared by application-layer tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use kizuna::{
    Availability, AvailabilityPolicy, CallAnalyzer, CallContext, CallLogRepository, CallScore,
    CallingPlatform, ContextBuilder, DomainError, MemoryHit, MemoryService, OutboundCallInfo,
    RelationshipScore, ScoreDeltas, ScoreHistoryEvent, ScoreHistoryRepository, TranscriptEntry,
    TurnScore, User, UserRepository,
};

/// In-memory UserRepository with optional failure and per-lookup delay
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
    scores: Mutex<HashMap<Uuid, RelationshipScore>>,
    fail: bool,
    lookup_delay: Option<Duration>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().insert(user.id, user);
        self
    }

    pub fn with_score(self, score: RelationshipScore) -> Self {
        self.scores.lock().unwrap().insert(score.user_id, score);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    pub fn score_of(&self, user_id: Uuid) -> Option<RelationshipScore> {
        self.scores.lock().unwrap().get(&user_id).cloned()
    }

    fn check_fail(&self) -> Result<(), DomainError> {
        if self.fail {
            Err(DomainError::Repository("storage offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        self.check_fail()?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError> {
        self.check_fail()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.phone_number.as_deref() == Some(phone_number))
            .cloned())
    }

    async fn find_score(&self, user_id: Uuid) -> Result<Option<RelationshipScore>, DomainError> {
        self.check_fail()?;
        Ok(self.scores.lock().unwrap().get(&user_id).cloned())
    }

    async fn save_score(
        &self,
        score: &RelationshipScore,
    ) -> Result<RelationshipScore, DomainError> {
        self.check_fail()?;
        self.scores
            .lock()
            .unwrap()
            .insert(score.user_id, score.clone());
        Ok(score.clone())
    }

    async fn touch_last_interaction(&self, _user_id: Uuid) -> Result<(), DomainError> {
        self.check_fail()?;
        Ok(())
    }
}

/// ScoreHistoryRepository that records appended events
#[derive(Default)]
pub struct RecordingHistory {
    events: Mutex<Vec<ScoreHistoryEvent>>,
}

impl RecordingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScoreHistoryEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreHistoryRepository for RecordingHistory {
    async fn append(&self, event: &ScoreHistoryEvent) -> Result<(), DomainError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn recent(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ScoreHistoryEvent>, DomainError> {
        let mut events: Vec<_> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        events.reverse();
        events.truncate(limit as usize);
        Ok(events)
    }
}

/// CallLogRepository that records call starts
#[derive(Default)]
pub struct RecordingCallLogs {
    starts: Mutex<Vec<(Uuid, String)>>,
}

impl RecordingCallLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> Vec<(Uuid, String)> {
        self.starts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallLogRepository for RecordingCallLogs {
    async fn record_start(&self, user_id: Uuid, session_id: &str) -> Result<(), DomainError> {
        self.starts
            .lock()
            .unwrap()
            .push((user_id, session_id.to_string()));
        Ok(())
    }
}

/// Analyzer stub with fixed deltas and an invocation counter
pub struct StubAnalyzer {
    pub deltas: ScoreDeltas,
    pub calls: AtomicUsize,
    fail: bool,
}

impl StubAnalyzer {
    pub fn new(deltas: ScoreDeltas) -> Self {
        Self {
            deltas,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            deltas: ScoreDeltas::zero(),
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallAnalyzer for StubAnalyzer {
    async fn score_call(
        &self,
        _transcript: &[TranscriptEntry],
        duration_seconds: i64,
    ) -> Result<CallScore, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::ExternalService("analyzer down".to_string()));
        }
        Ok(CallScore {
            session_id: String::new(),
            deltas: self.deltas,
            explanation: "stub".to_string(),
            duration_seconds,
            behaviors_identified: Vec::new(),
            confidence: 0.9,
        })
    }

    async fn score_turn(
        &self,
        _user_text: &str,
        _agent_text: &str,
    ) -> Result<TurnScore, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::ExternalService("analyzer down".to_string()));
        }
        Ok(TurnScore {
            deltas: self.deltas,
            comment: "good exchange".to_string(),
        })
    }
}

/// Memory stub with optional failure, recording stored facts
#[derive(Default)]
pub struct StubMemory {
    pub hits: Vec<MemoryHit>,
    fail: bool,
    stored: Mutex<Vec<(Uuid, String, String)>>,
}

impl StubMemory {
    pub fn with_hits(hits: Vec<MemoryHit>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Vec<(Uuid, String, String)> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemoryService for StubMemory {
    async fn search(
        &self,
        _user_id: Uuid,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<MemoryHit>, DomainError> {
        if self.fail {
            return Err(DomainError::ExternalService("memory down".to_string()));
        }
        Ok(self.hits.clone())
    }

    async fn store(
        &self,
        user_id: Uuid,
        content: &str,
        category: &str,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::ExternalService("memory down".to_string()));
        }
        self.stored
            .lock()
            .unwrap()
            .push((user_id, content.to_string(), category.to_string()));
        Ok(())
    }
}

/// ContextBuilder stub emitting a minimal but non-empty context
pub struct StubContext;

#[async_trait]
impl ContextBuilder for StubContext {
    async fn build(
        &self,
        user: &User,
        _score: &RelationshipScore,
    ) -> Result<CallContext, DomainError> {
        Ok(CallContext {
            dynamic_variables: serde_json::json!({ "user_name": user.name }),
            conversation_config_override: serde_json::json!({ "agent": { "language": "en" } }),
        })
    }
}

/// Fixed-outcome availability policy
pub struct FixedPolicy(pub Availability);

#[async_trait]
impl AvailabilityPolicy for FixedPolicy {
    async fn check(&self, _user: &User) -> Result<Availability, DomainError> {
        Ok(self.0.clone())
    }
}

/// Calling platform stub
pub struct StubPlatform {
    fail: bool,
}

impl StubPlatform {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl CallingPlatform for StubPlatform {
    async fn start_outbound_call(
        &self,
        _phone_number: &str,
        session_id: &str,
        _token: &str,
        _context: &CallContext,
    ) -> Result<OutboundCallInfo, DomainError> {
        if self.fail {
            return Err(DomainError::ExternalService(
                "Outbound call rejected (402): quota exceeded".to_string(),
            ));
        }
        Ok(OutboundCallInfo {
            call_id: format!("call_{session_id}"),
        })
    }
}
