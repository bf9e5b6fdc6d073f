//! PostgreSQL implementation of ScoreHistoryRepository
//!
//! The score_history table is insert-only; nothing here updates or
//! deletes rows.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use kizuna::{DomainError, ScoreDeltas, ScoreHistoryEvent, ScoreHistoryRepository};

/// PostgreSQL implementation of ScoreHistoryRepository
pub struct PgScoreHistoryRepository {
    pool: PgPool,
}

impl PgScoreHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    user_id: Uuid,
    event_type: String,
    old_score: f64,
    new_score: f64,
    session_id: String,
    duration_seconds: i64,
    deltas: serde_json::Value,
    explanation: String,
    behaviors: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<HistoryRow> for ScoreHistoryEvent {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            event_type: row.event_type,
            old_score: row.old_score,
            new_score: row.new_score,
            session_id: row.session_id,
            duration_seconds: row.duration_seconds,
            deltas: serde_json::from_value::<ScoreDeltas>(row.deltas).unwrap_or_default(),
            explanation: row.explanation,
            behaviors: serde_json::from_value(row.behaviors).unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ScoreHistoryRepository for PgScoreHistoryRepository {
    async fn append(&self, event: &ScoreHistoryEvent) -> Result<(), DomainError> {
        let deltas = serde_json::to_value(event.deltas)
            .map_err(|e| DomainError::Repository(e.to_string()))?;
        let behaviors = serde_json::to_value(&event.behaviors)
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO score_history
                (id, user_id, event_type, old_score, new_score, session_id,
                 duration_seconds, deltas, explanation, behaviors, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(&event.event_type)
        .bind(event.old_score)
        .bind(event.new_score)
        .bind(&event.session_id)
        .bind(event.duration_seconds)
        .bind(deltas)
        .bind(&event.explanation)
        .bind(behaviors)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn recent(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ScoreHistoryEvent>, DomainError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT * FROM score_history WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
