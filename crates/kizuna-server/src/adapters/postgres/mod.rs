//! PostgreSQL Repository Implementations

mod call_log_repository;
mod score_history_repository;
mod user_repository;

pub use call_log_repository::PgCallLogRepository;
pub use score_history_repository::PgScoreHistoryRepository;
pub use user_repository::PgUserRepository;
