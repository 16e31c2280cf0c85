//! PostgreSQL daily delivery repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use cleanclip_types::ServiceType;

use crate::error::DbResult;
use crate::models::DeliveryRow;
use crate::repo::{CreateDelivery, DeliveryRepository};

/// PostgreSQL daily delivery repository
#[derive(Clone)]
pub struct PgDeliveryRepository {
    pool: PgPool,
}

impl PgDeliveryRepository {
    /// Create a new delivery repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryRepository for PgDeliveryRepository {
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> DbResult<Option<DeliveryRow>> {
        let delivery = sqlx::query_as::<_, DeliveryRow>(
            r#"
            SELECT id, user_id, template_id, delivery_date, delivered_at
            FROM daily_deliveries
            WHERE user_id = $1 AND delivery_date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(delivery)
    }

    async fn create(&self, delivery: CreateDelivery) -> DbResult<DeliveryRow> {
        // Unique (user_id, delivery_date) violations surface as DbError::Conflict
        let row = sqlx::query_as::<_, DeliveryRow>(
            r#"
            INSERT INTO daily_deliveries (user_id, template_id, delivery_date)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, template_id, delivery_date, delivered_at
            "#,
        )
        .bind(delivery.user_id)
        .bind(delivery.template_id)
        .bind(delivery.delivery_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_for_service_type(
        &self,
        user_id: Uuid,
        service_type: ServiceType,
    ) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM daily_deliveries d
            USING content_templates ct
            WHERE d.template_id = ct.id
              AND d.user_id = $1
              AND ct.service_type = $2
            "#,
        )
        .bind(user_id)
        .bind(service_type.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_for_user(&self, user_id: Uuid) -> DbResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM daily_deliveries WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.max(0) as u64)
    }
}
