//! Kizuna Domain Library
//!
//! Core domain types and interfaces for the Kizuna voice companion system.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (User, CallSession, CallScore)
//!   - `value_objects/`: Immutable value types (Mood, ToolName)
//!   - `errors/`: Domain-specific error types
//!
//! - **Auth** (`auth/`): Capability tokens and webhook signature verification
//!
//! - **Session** (`session`): In-process call session registry (state machine)
//!
//! - **Scoring** (`scoring`): Transcript-to-score aggregation
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use kizuna::domain::{User, CallSession, CallScore};
//! use kizuna::ports::{UserRepository, CallAnalyzer};
//! ```

pub mod auth;
pub mod domain;
pub mod ports;
pub mod scoring;
pub mod session;

// Re-export commonly used types
pub use auth::{TokenAuthority, WebhookVerifier, TOKEN_TTL_SECS, WEBHOOK_REPLAY_WINDOW_SECS};
pub use domain::{
    AuthError, CallScore, CallSession, DomainError, Mood, RelationshipScore, ScoreDeltas,
    ScoreHistoryEvent, SessionState, ToolName, TranscriptEntry, TranscriptRole, TurnScore, User,
    WebhookError,
};
pub use ports::{
    Availability, AvailabilityPolicy, CallAnalyzer, CallContext, CallLogRepository,
    CallingPlatform, ContextBuilder, MemoryHit, MemoryService, OutboundCallInfo,
    ScoreHistoryRepository, UserRepository,
};
pub use scoring::ScoreAggregator;
pub use session::{SessionRegistry, RECOVERY_WINDOW_SECS};
