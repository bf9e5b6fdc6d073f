//! PostgreSQL implementation of CallLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use kizuna::{CallLogRepository, DomainError};

/// PostgreSQL implementation of CallLogRepository
pub struct PgCallLogRepository {
    pool: PgPool,
}

impl PgCallLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CallLogRepository for PgCallLogRepository {
    async fn record_start(&self, user_id: Uuid, session_id: &str) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO call_logs (user_id, session_id, started_at) VALUES ($1, $2, NOW())",
        )
        .bind(user_id)
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }
}
