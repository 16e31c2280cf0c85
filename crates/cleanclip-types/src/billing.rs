//! Billing and payment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stripe customer ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl CustomerId {
    /// Create a new customer ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Billing interval of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanInterval {
    Month,
    Year,
}

/// A purchasable plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Stripe price ID (unset when the price is not configured)
    pub price_id: Option<String>,
    /// Price in whole currency units
    pub amount: u32,
    /// ISO currency code
    pub currency: String,
    /// Billing interval
    pub interval: PlanInterval,
}

/// Result of a checkout session request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe checkout session ID
    pub session_id: String,
    /// Checkout URL to redirect user to
    pub url: String,
}

/// Result of a cancel-at-period-end request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationOutcome {
    /// When access ends
    pub ends_at: Option<DateTime<Utc>>,
}

/// Result of a processed self-serve refund
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundOutcome {
    /// Processor refund ID
    pub refund_id: String,
    /// Refunded amount in cents
    pub amount_cents: i64,
}

impl RefundOutcome {
    /// Refunded amount in currency units
    pub fn amount(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }
}
