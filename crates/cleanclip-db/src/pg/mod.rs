//! PostgreSQL repository implementations

mod delivery;
mod profile;
mod refund;
mod template;
mod user;

pub use delivery::PgDeliveryRepository;
pub use profile::PgProfileRepository;
pub use refund::PgRefundLogRepository;
pub use template::PgTemplateRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub profiles: PgProfileRepository,
    pub templates: PgTemplateRepository,
    pub deliveries: PgDeliveryRepository,
    pub refunds: PgRefundLogRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            profiles: PgProfileRepository::new(pool.clone()),
            templates: PgTemplateRepository::new(pool.clone()),
            deliveries: PgDeliveryRepository::new(pool.clone()),
            refunds: PgRefundLogRepository::new(pool),
        }
    }
}
