//! Billing configuration

use std::time::Duration;

use cleanclip_types::{Plan, PlanInterval};

/// Monthly plan price in dollars
pub const MONTHLY_AMOUNT: u32 = 9;
/// Yearly plan price in dollars
pub const YEARLY_AMOUNT: u32 = 79;

/// Billing service configuration
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe webhook secret
    pub stripe_webhook_secret: String,
    /// Stripe price ID of the monthly plan
    pub monthly_price_id: Option<String>,
    /// Stripe price ID of the yearly plan
    pub yearly_price_id: Option<String>,
    /// Days after subscription start during which a refund may be requested
    pub refund_window_days: i64,
    /// Allowed clock skew for webhook timestamps, in seconds
    pub webhook_tolerance_secs: i64,
    /// Checkout success redirect
    pub success_url: String,
    /// Checkout cancel redirect
    pub cancel_url: String,
    /// Where the billing portal sends the user back to
    pub portal_return_url: String,
    /// Total timeout for Stripe API calls
    pub request_timeout: Duration,
}

impl BillingConfig {
    /// Create a new billing config
    pub fn new(
        stripe_secret_key: impl Into<String>,
        stripe_webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            stripe_secret_key: stripe_secret_key.into(),
            stripe_webhook_secret: stripe_webhook_secret.into(),
            monthly_price_id: None,
            yearly_price_id: None,
            refund_window_days: 7,
            webhook_tolerance_secs: 300,
            success_url: "http://localhost:3000/subscription/success".to_string(),
            cancel_url: "http://localhost:3000/subscription/cancel".to_string(),
            portal_return_url: "http://localhost:3000/settings".to_string(),
            request_timeout: Duration::from_secs(20),
        }
    }

    /// Set the two plan price IDs
    pub fn with_prices(mut self, monthly: Option<String>, yearly: Option<String>) -> Self {
        self.monthly_price_id = monthly.filter(|p| !p.is_empty());
        self.yearly_price_id = yearly.filter(|p| !p.is_empty());
        self
    }

    /// Set the refund window
    pub fn with_refund_window_days(mut self, days: i64) -> Self {
        self.refund_window_days = days;
        self
    }

    /// Derive redirect URLs from the frontend base URL
    pub fn with_app_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.success_url = format!("{base}/subscription/success");
        self.cancel_url = format!("{base}/subscription/cancel");
        self.portal_return_url = format!("{base}/settings");
        self
    }

    /// Set the Stripe request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The monthly and yearly plans, in that order
    pub fn plans(&self) -> Vec<Plan> {
        vec![
            Plan {
                price_id: self.monthly_price_id.clone(),
                amount: MONTHLY_AMOUNT,
                currency: "usd".to_string(),
                interval: PlanInterval::Month,
            },
            Plan {
                price_id: self.yearly_price_id.clone(),
                amount: YEARLY_AMOUNT,
                currency: "usd".to_string(),
                interval: PlanInterval::Year,
            },
        ]
    }

    /// Whether `price_id` is one of the configured plan prices
    pub fn is_known_price(&self, price_id: &str) -> bool {
        [&self.monthly_price_id, &self.yearly_price_id]
            .into_iter()
            .flatten()
            .any(|p| p == price_id)
    }
}
