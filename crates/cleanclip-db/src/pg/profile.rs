//! PostgreSQL profile repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::ProfileRow;
use crate::repo::{ProfileRepository, UpsertProfile};

/// PostgreSQL profile repository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<ProfileRow>> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, service_type, timezone, onboarding_completed, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn upsert(&self, profile: UpsertProfile) -> DbResult<ProfileRow> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, service_type, timezone, onboarding_completed)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET service_type = EXCLUDED.service_type,
                timezone = EXCLUDED.timezone,
                onboarding_completed = EXCLUDED.onboarding_completed,
                updated_at = NOW()
            RETURNING user_id, service_type, timezone, onboarding_completed, created_at, updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.service_type)
        .bind(&profile.timezone)
        .bind(profile.onboarding_completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_service_type(&self, user_id: Uuid, service_type: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE profiles SET service_type = $1, updated_at = NOW() WHERE user_id = $2",
        )
        .bind(service_type)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn update_timezone(&self, user_id: Uuid, timezone: &str) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE profiles SET timezone = $1, updated_at = NOW() WHERE user_id = $2")
                .bind(timezone)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
