//! Application state for the Content API service.

use std::sync::Arc;

use cleanclip_auth_core::IdentityProvider;
use cleanclip_billing_core::{StripeProvider, SubscriptionService};
use cleanclip_content_core::{ContentService, ProfileService};
use cleanclip_db::{
    DbPool, PgDeliveryRepository, PgProfileRepository, PgRefundLogRepository,
    PgTemplateRepository, PgUserRepository, Repositories,
};
use cleanclip_types::Clock;

use crate::config::Config;

/// Daily content rotation over PostgreSQL
pub type Content = ContentService<PgProfileRepository, PgTemplateRepository, PgDeliveryRepository>;

/// Profile management over PostgreSQL
pub type Profiles = ProfileService<PgUserRepository, PgProfileRepository>;

/// Subscription state and self-serve billing over PostgreSQL and Stripe
pub type Billing = SubscriptionService<PgUserRepository, PgRefundLogRepository, StripeProvider>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Daily content rotation
    pub content: Arc<Content>,
    /// Service type and timezone preferences
    pub profiles: Arc<Profiles>,
    /// Subscription synchronizer and refund policy
    pub billing: Arc<Billing>,
    /// Bearer credential verification
    pub identity: Arc<dyn IdentityProvider>,
    /// Database pool (readiness probe)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the services over one pool
    pub fn new(
        pool: DbPool,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        let repos = Repositories::new(pool.clone());
        let users = Arc::new(repos.users);
        let profiles = Arc::new(repos.profiles);

        let content = ContentService::new(
            Arc::clone(&profiles),
            Arc::new(repos.templates),
            Arc::new(repos.deliveries),
            Arc::clone(&clock),
        );
        let profile_service = ProfileService::new(Arc::clone(&users), profiles);
        let billing = SubscriptionService::new(
            users,
            Arc::new(repos.refunds),
            Arc::new(StripeProvider::new(config.billing.clone())),
            config.billing.clone(),
            clock,
        );

        Self {
            content: Arc::new(content),
            profiles: Arc::new(profile_service),
            billing: Arc::new(billing),
            identity,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("http_port", &self.config.http_port)
            .finish_non_exhaustive()
    }
}
