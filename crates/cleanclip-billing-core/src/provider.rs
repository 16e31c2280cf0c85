//! Payment provider abstraction

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use cleanclip_types::{CheckoutSession, CustomerId};

use crate::BillingError;

/// Most recent charge on a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeSummary {
    /// Charge ID
    pub id: String,
    /// Amount in cents
    pub amount_cents: i64,
}

/// Confirmation of a processed refund
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundReceipt {
    /// Refund ID
    pub id: String,
    /// Amount refunded in cents
    pub amount_cents: i64,
}

/// Payment provider trait
///
/// Abstracts payment processing to allow different providers (Stripe, etc.)
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer for the given email
    async fn create_customer(&self, email: &str, user_id: &str)
        -> Result<CustomerId, BillingError>;

    /// Create a subscription checkout session
    async fn create_checkout_session(
        &self,
        customer_id: &str,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError>;

    /// Create a customer portal session
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, BillingError>;

    /// Flag a subscription to end with its current period; returns the
    /// period end when the provider reports one
    async fn cancel_at_period_end(
        &self,
        subscription_id: &str,
    ) -> Result<Option<DateTime<Utc>>, BillingError>;

    /// Cancel a subscription immediately
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), BillingError>;

    /// Most recent charge for a customer
    async fn latest_charge(&self, customer_id: &str)
        -> Result<Option<ChargeSummary>, BillingError>;

    /// Refund a charge in full
    async fn create_refund(&self, charge_id: &str) -> Result<RefundReceipt, BillingError>;
}
