//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::UserRow;
use crate::repo::UserRepository;

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, subscription_status, stripe_customer_id, stripe_subscription_id,
                   subscription_started_at, subscription_ends_at, refund_used, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_stripe_customer_id(&self, customer_id: &str) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, subscription_status, stripe_customer_id, stripe_subscription_id,
                   subscription_started_at, subscription_ends_at, refund_used, created_at
            FROM users
            WHERE stripe_customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn ensure(&self, id: Uuid, email: &str) -> DbResult<UserRow> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(email)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or(DbError::NotFound)
    }

    async fn update_stripe_customer_id(&self, id: Uuid, customer_id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET stripe_customer_id = $1 WHERE id = $2")
            .bind(customer_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn start_subscription(
        &self,
        id: Uuid,
        subscription_id: &str,
        status: &str,
        started_at: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET subscription_status = $1,
                stripe_subscription_id = $2,
                subscription_started_at = $3,
                subscription_ends_at = NULL
            WHERE id = $4
            "#,
        )
        .bind(status)
        .bind(subscription_id)
        .bind(started_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn sync_subscription(
        &self,
        id: Uuid,
        subscription_id: &str,
        status: &str,
        ends_at: Option<DateTime<Utc>>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET subscription_status = $1,
                stripe_subscription_id = $2,
                subscription_ends_at = COALESCE($3, subscription_ends_at)
            WHERE id = $4
            "#,
        )
        .bind(status)
        .bind(subscription_id)
        .bind(ends_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: &str,
        ends_at: Option<DateTime<Utc>>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET subscription_status = $1,
                subscription_ends_at = COALESCE($2, subscription_ends_at)
            WHERE id = $3
            "#,
        )
        .bind(status)
        .bind(ends_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remember_subscription(&self, id: Uuid, subscription_id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO stripe_subscriptions (subscription_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (subscription_id) DO NOTHING
            "#,
        )
        .bind(subscription_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_refund_used(&self, id: Uuid) -> DbResult<()> {
        sqlx::query("UPDATE users SET refund_used = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
