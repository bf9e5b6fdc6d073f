//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod analyzer;
pub mod context;
pub mod memory;
pub mod platform;
pub mod postgres;

// Re-exports
pub use analyzer::HttpCallAnalyzer;
pub use context::ProfileContextBuilder;
pub use memory::HttpMemoryService;
pub use platform::PlatformClient;
pub use postgres::{PgCallLogRepository, PgScoreHistoryRepository, PgUserRepository};
