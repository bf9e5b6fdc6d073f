//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod call_log_repository;
mod score_history_repository;
mod user_repository;

pub use call_log_repository::*;
pub use score_history_repository::*;
pub use user_repository::*;
