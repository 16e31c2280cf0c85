//! Billing errors

use thiserror::Error;

/// Billing errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// User not found
    #[error("user not found")]
    UserNotFound,

    /// No processor subscription on file
    #[error("no active subscription")]
    NoActiveSubscription,

    /// No Stripe customer on file
    #[error("no billing account found")]
    NoBillingAccount,

    /// The customer has no charge to refund
    #[error("no charges found")]
    NoChargeFound,

    /// Refund already used or outside the refund window
    #[error("not eligible for refund")]
    RefundIneligible,

    /// Content access needs an active or trialing subscription
    #[error("active subscription required")]
    SubscriptionRequired,

    /// Price ID is not one of the configured plans
    #[error("unknown price: {0}")]
    InvalidPrice(String),

    /// Payment provider error
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Webhook verification or processing error
    #[error("webhook error: {0}")]
    WebhookError(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] cleanclip_db::DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound)
    }

    /// Check if this is a provider error
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::ProviderError(_))
    }

    /// Whether the caller asked for something their account state does not allow
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NoActiveSubscription
                | Self::NoBillingAccount
                | Self::NoChargeFound
                | Self::RefundIneligible
                | Self::InvalidPrice(_)
        )
    }
}
