//! PostgreSQL refund log repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::RefundLogRow;
use crate::repo::{CreateRefundLog, RefundLogRepository};

/// PostgreSQL refund log repository
#[derive(Clone)]
pub struct PgRefundLogRepository {
    pool: PgPool,
}

impl PgRefundLogRepository {
    /// Create a new refund log repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefundLogRepository for PgRefundLogRepository {
    async fn create(&self, entry: CreateRefundLog) -> DbResult<RefundLogRow> {
        let row = sqlx::query_as::<_, RefundLogRow>(
            r#"
            INSERT INTO refund_log (user_id, stripe_refund_id, amount_cents, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, stripe_refund_id, amount_cents, reason, created_at
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.stripe_refund_id)
        .bind(entry.amount_cents)
        .bind(&entry.reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<RefundLogRow>> {
        let rows = sqlx::query_as::<_, RefundLogRow>(
            r#"
            SELECT id, user_id, stripe_refund_id, amount_cents, reason, created_at
            FROM refund_log
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
