//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use cleanclip_types::ServiceType;

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by Stripe customer ID
    async fn find_by_stripe_customer_id(&self, customer_id: &str) -> DbResult<Option<UserRow>>;

    /// Insert the user if missing and return the stored row
    async fn ensure(&self, id: Uuid, email: &str) -> DbResult<UserRow>;

    /// Update user's Stripe customer ID
    async fn update_stripe_customer_id(&self, id: Uuid, customer_id: &str) -> DbResult<()>;

    /// Attach a processor subscription and stamp its start.
    /// Clears any previous end timestamp.
    async fn start_subscription(
        &self,
        id: Uuid,
        subscription_id: &str,
        status: &str,
        started_at: DateTime<Utc>,
    ) -> DbResult<()>;

    /// Apply a webhook status change and record the subscription it belongs
    /// to. `ends_at` of `None` leaves the stored end timestamp untouched.
    async fn sync_subscription(
        &self,
        id: Uuid,
        subscription_id: &str,
        status: &str,
        ends_at: Option<DateTime<Utc>>,
    ) -> DbResult<()>;

    /// Set the subscription status. `ends_at` of `None` leaves the stored
    /// end timestamp untouched.
    async fn update_status(
        &self,
        id: Uuid,
        status: &str,
        ends_at: Option<DateTime<Utc>>,
    ) -> DbResult<()>;

    /// Record a processor subscription id against the user.
    /// Returns `false` when the id was already known.
    async fn remember_subscription(&self, id: Uuid, subscription_id: &str) -> DbResult<bool>;

    /// Consume the one-time refund
    async fn mark_refund_used(&self, id: Uuid) -> DbResult<()>;
}

/// Profile repository trait
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile of a user
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<ProfileRow>>;

    /// Insert or replace a profile
    async fn upsert(&self, profile: UpsertProfile) -> DbResult<ProfileRow>;

    /// Change the service type
    async fn update_service_type(&self, user_id: Uuid, service_type: &str) -> DbResult<()>;

    /// Change the timezone
    async fn update_timezone(&self, user_id: Uuid, timezone: &str) -> DbResult<()>;
}

/// Upsert profile input
#[derive(Debug, Clone)]
pub struct UpsertProfile {
    pub user_id: Uuid,
    pub service_type: String,
    pub timezone: String,
    pub onboarding_completed: bool,
}

/// Content template repository trait
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Find a template by ID
    async fn find_by_id(&self, id: i32) -> DbResult<Option<TemplateRow>>;

    /// Pick one active template of the service type that the user has no
    /// delivery record for
    async fn find_unseen(
        &self,
        user_id: Uuid,
        service_type: ServiceType,
    ) -> DbResult<Option<TemplateRow>>;

    /// Count active templates of a service type
    async fn count_active(&self, service_type: ServiceType) -> DbResult<u64>;
}

/// Daily delivery repository trait
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Find the delivery of a user on a calendar date
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> DbResult<Option<DeliveryRow>>;

    /// Record a delivery. A second record for the same (user, date)
    /// fails with `DbError::Conflict`.
    async fn create(&self, delivery: CreateDelivery) -> DbResult<DeliveryRow>;

    /// Delete every delivery of the user whose template belongs to the
    /// service type. Returns the number of deleted rows.
    async fn delete_for_service_type(
        &self,
        user_id: Uuid,
        service_type: ServiceType,
    ) -> DbResult<u64>;

    /// Count all deliveries of a user
    async fn count_for_user(&self, user_id: Uuid) -> DbResult<u64>;
}

/// Create delivery input
#[derive(Debug, Clone)]
pub struct CreateDelivery {
    pub user_id: Uuid,
    pub template_id: i32,
    pub delivery_date: NaiveDate,
}

/// Refund log repository trait
#[async_trait]
pub trait RefundLogRepository: Send + Sync {
    /// Append a refund log entry
    async fn create(&self, entry: CreateRefundLog) -> DbResult<RefundLogRow>;

    /// All refund log entries of a user, newest first
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<RefundLogRow>>;
}

/// Create refund log input
#[derive(Debug, Clone)]
pub struct CreateRefundLog {
    pub user_id: Uuid,
    pub stripe_refund_id: String,
    pub amount_cents: i64,
    pub reason: Option<String>,
}
