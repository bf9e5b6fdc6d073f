//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use kizuna::{DomainError, RelationshipScore, User, UserRepository};

/// PostgreSQL implementation of UserRepository
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    phone_number: Option<String>,
    stage: i32,
    engagement_state: String,
    active: bool,
    trait_prefs: serde_json::Value,
    last_interaction_at: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone_number: row.phone_number,
            stage: row.stage,
            engagement_state: row.engagement_state,
            active: row.active,
            trait_prefs: row.trait_prefs,
            last_interaction_at: row.last_interaction_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ScoreRow {
    id: Uuid,
    user_id: Uuid,
    intimacy: f64,
    passion: f64,
    trust: f64,
    secureness: f64,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ScoreRow> for RelationshipScore {
    fn from(row: ScoreRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            intimacy: row.intimacy,
            passion: row.passion,
            trust: row.trust,
            secureness: row.secureness,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE phone_number = $1")
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_score(&self, user_id: Uuid) -> Result<Option<RelationshipScore>, DomainError> {
        let row = sqlx::query_as::<_, ScoreRow>(
            "SELECT * FROM relationship_scores WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn save_score(
        &self,
        score: &RelationshipScore,
    ) -> Result<RelationshipScore, DomainError> {
        let row = sqlx::query_as::<_, ScoreRow>(
            r#"
            INSERT INTO relationship_scores
                (id, user_id, intimacy, passion, trust, secureness, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET intimacy = $3, passion = $4, trust = $5, secureness = $6, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(score.id)
        .bind(score.user_id)
        .bind(score.intimacy)
        .bind(score.passion)
        .bind(score.trust)
        .bind(score.secureness)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn touch_last_interaction(&self, user_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET last_interaction_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(())
    }
}
