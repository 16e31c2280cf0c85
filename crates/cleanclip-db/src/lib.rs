//! Cleanclip DB - Database abstractions
//!
//! SQLx-based database layer for cleanclip services. Services depend on the
//! repository traits in [`repo`]; [`pg`] holds the PostgreSQL implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use cleanclip_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/cleanclip").await?;
//! cleanclip_db::migrate(&pool).await?;
//! let repos = Repositories::new(pool);
//!
//! let profile = repos.profiles.find_by_user_id(user_id).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;
pub mod schema;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::{
    PgDeliveryRepository, PgProfileRepository, PgRefundLogRepository, PgTemplateRepository,
    PgUserRepository, Repositories,
};
pub use pool::{create_pool, create_pool_with_options, DbPool, PoolOptions};
pub use repo::*;
pub use schema::migrate;
