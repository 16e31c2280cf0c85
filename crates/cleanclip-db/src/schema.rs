//! Schema management

use tracing::instrument;

use crate::DbPool;

const MIGRATION_0001: &str = include_str!("../migrations/0001_init.sql");

/// Apply the schema. Every statement is idempotent.
#[instrument(level = "info", skip(pool))]
pub async fn migrate(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(MIGRATION_0001).execute(pool).await?;
    Ok(())
}
