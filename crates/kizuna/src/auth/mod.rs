//! Auth - Capability tokens and webhook signatures
//!
//! Pure, synchronous cryptographic checks. These are the trust
//! boundaries for in-call tool requests (tokens) and asynchronous
//! platform events (webhook signatures).

pub mod token;
pub mod webhook;

pub use token::{TokenAuthority, TOKEN_TTL_SECS};
pub use webhook::{WebhookVerifier, WEBHOOK_REPLAY_WINDOW_SECS};
