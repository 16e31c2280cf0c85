//! PostgreSQL content template repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use cleanclip_types::ServiceType;

use crate::error::DbResult;
use crate::models::TemplateRow;
use crate::repo::TemplateRepository;

/// PostgreSQL content template repository
#[derive(Clone)]
pub struct PgTemplateRepository {
    pool: PgPool,
}

impl PgTemplateRepository {
    /// Create a new template repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for PgTemplateRepository {
    async fn find_by_id(&self, id: i32) -> DbResult<Option<TemplateRow>> {
        let template = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT id, service_type, script, caption, cta, category, is_active, created_at
            FROM content_templates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }

    async fn find_unseen(
        &self,
        user_id: Uuid,
        service_type: ServiceType,
    ) -> DbResult<Option<TemplateRow>> {
        let template = sqlx::query_as::<_, TemplateRow>(
            r#"
            SELECT ct.id, ct.service_type, ct.script, ct.caption, ct.cta, ct.category,
                   ct.is_active, ct.created_at
            FROM content_templates ct
            WHERE ct.service_type = $1
              AND ct.is_active
              AND NOT EXISTS (
                  SELECT 1 FROM daily_deliveries d
                  WHERE d.user_id = $2 AND d.template_id = ct.id
              )
            ORDER BY random()
            LIMIT 1
            "#,
        )
        .bind(service_type.as_str())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }

    async fn count_active(&self, service_type: ServiceType) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM content_templates WHERE service_type = $1 AND is_active",
        )
        .bind(service_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }
}
