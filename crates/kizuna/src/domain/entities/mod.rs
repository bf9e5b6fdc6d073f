//! Domain Entities
//!
//! - User: the person a companion calls
//! - RelationshipScore: the four-dimension relationship state
//! - CallSession: lifecycle of one live call
//! - CallScore / ScoreHistoryEvent: outcome of a finished call
//! - TranscriptEntry: one exchange line of a call transcript

pub mod score;
pub mod session;
pub mod transcript;
pub mod user;

pub use score::*;
pub use session::*;
pub use transcript::*;
pub use user::*;
