//! Cleanclip Billing Core - Subscription state and refunds
//!
//! Keeps the local subscription status in step with Stripe through signed
//! webhooks, and implements the self-serve billing operations: checkout,
//! cancel at period end, the one-time refund, and the billing portal.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cleanclip_billing_core::{BillingConfig, StripeProvider, SubscriptionService};
//! use cleanclip_types::SystemClock;
//!
//! let config = BillingConfig::new("sk_test_...", "whsec_...")
//!     .with_prices(Some("price_monthly".into()), Some("price_yearly".into()))
//!     .with_refund_window_days(7);
//!
//! let billing = SubscriptionService::new(
//!     Arc::new(repos.users.clone()),
//!     Arc::new(repos.refunds.clone()),
//!     Arc::new(StripeProvider::new(config.clone())),
//!     config,
//!     Arc::new(SystemClock),
//! );
//!
//! let outcome = billing.request_refund(&user_id, Some("changed my mind".into())).await?;
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod service;
pub mod stripe;
pub mod webhook;

pub use config::BillingConfig;
pub use error::BillingError;
pub use provider::{ChargeSummary, PaymentProvider, RefundReceipt};
pub use service::{refund_window_open, SubscriptionService, WebhookOutcome};
pub use stripe::StripeProvider;
pub use webhook::{
    SubscriptionData, WebhookEvent, WebhookEventData, WebhookEventType, WebhookHandler,
};
