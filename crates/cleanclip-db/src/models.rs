//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Conversions into validated domain types live next to each row.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use cleanclip_types::{
    ContentTemplate, Profile, ServiceType, SubscriptionStatus, TemplateId, Timezone, UserId,
};

use crate::error::{DbError, DbResult};

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub subscription_status: String,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub subscription_started_at: Option<DateTime<Utc>>,
    pub subscription_ends_at: Option<DateTime<Utc>>,
    pub refund_used: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub service_type: String,
    pub timezone: String,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content template row from the database
#[derive(Debug, Clone, FromRow)]
pub struct TemplateRow {
    pub id: i32,
    pub service_type: String,
    pub script: String,
    pub caption: String,
    pub cta: Option<String>,
    pub category: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Daily delivery row from the database
#[derive(Debug, Clone, FromRow)]
pub struct DeliveryRow {
    pub id: i32,
    pub user_id: Uuid,
    pub template_id: i32,
    pub delivery_date: NaiveDate,
    pub delivered_at: DateTime<Utc>,
}

/// Refund log row from the database
#[derive(Debug, Clone, FromRow)]
pub struct RefundLogRow {
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub stripe_refund_id: Option<String>,
    pub amount_cents: Option<i64>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Parse the stored subscription status
    pub fn status(&self) -> DbResult<SubscriptionStatus> {
        self.subscription_status
            .parse()
            .map_err(|e: cleanclip_types::ParseEnumError| DbError::InvalidRow(e.to_string()))
    }
}

impl ProfileRow {
    /// Convert to the domain profile.
    ///
    /// The service type is CHECK-constrained in storage, so a bad value is a
    /// hard error. The timezone is free text; it is returned separately so
    /// callers can decide how to handle an unparseable name.
    pub fn into_profile(self) -> DbResult<(Profile, Option<String>)> {
        let service_type: ServiceType = self
            .service_type
            .parse()
            .map_err(|e: cleanclip_types::ParseEnumError| DbError::InvalidRow(e.to_string()))?;

        let (timezone, rejected) = match Timezone::parse(&self.timezone) {
            Ok(tz) => (tz, None),
            Err(_) => (Timezone::default(), Some(self.timezone)),
        };

        Ok((
            Profile {
                user_id: UserId(self.user_id),
                service_type,
                timezone,
                onboarding_completed: self.onboarding_completed,
            },
            rejected,
        ))
    }
}

impl TryFrom<TemplateRow> for ContentTemplate {
    type Error = DbError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let service_type: ServiceType = row
            .service_type
            .parse()
            .map_err(|e: cleanclip_types::ParseEnumError| DbError::InvalidRow(e.to_string()))?;

        ContentTemplate::new(
            TemplateId(row.id),
            service_type,
            row.script,
            row.caption,
            row.cta,
            row.category,
            row.is_active,
        )
        .map_err(|e| DbError::InvalidRow(format!("template {}: {e}", row.id)))
    }
}

impl DeliveryRow {
    /// Convert to domain TemplateId
    pub fn template_id(&self) -> TemplateId {
        TemplateId(self.template_id)
    }
}
