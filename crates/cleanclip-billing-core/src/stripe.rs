//! Stripe payment provider implementation

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use cleanclip_types::{CheckoutSession, CustomerId};

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::provider::{ChargeSummary, PaymentProvider, RefundReceipt};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Stripe payment provider
#[derive(Clone)]
pub struct StripeProvider {
    client: Client,
    config: BillingConfig,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: BillingConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    /// Make authenticated request to Stripe
    ///
    /// GET parameters travel in the query string, everything else as a form body.
    async fn stripe_request<T: for<'de> Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<T, BillingError> {
        let url = format!("{STRIPE_API_BASE}{endpoint}");
        let is_get = method == reqwest::Method::GET;

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.config.stripe_secret_key, Option::<&str>::None);

        if let Some(params) = params {
            request = if is_get {
                request.query(params)
            } else {
                request.form(params)
            };
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Stripe API request failed");
            BillingError::ProviderError(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Stripe API error");
            return Err(BillingError::ProviderError(format!(
                "Stripe API error: {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Stripe response");
            BillingError::Internal(e.to_string())
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self, email))]
    async fn create_customer(
        &self,
        email: &str,
        user_id: &str,
    ) -> Result<CustomerId, BillingError> {
        debug!("Creating Stripe customer");

        let form = [("email", email), ("metadata[user_id]", user_id)];
        let customer: StripeCustomer = self
            .stripe_request(reqwest::Method::POST, "/customers", Some(&form))
            .await?;

        Ok(CustomerId::new(customer.id))
    }

    #[instrument(skip(self))]
    async fn create_checkout_session(
        &self,
        customer_id: &str,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError> {
        debug!(customer_id = %customer_id, price_id = %price_id, "Creating checkout session");

        let form = [
            ("customer", customer_id),
            ("mode", "subscription"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("line_items[0][price]", price_id),
            ("line_items[0][quantity]", "1"),
        ];

        let session: StripeCheckoutSession = self
            .stripe_request(reqwest::Method::POST, "/checkout/sessions", Some(&form))
            .await?;

        let url = session
            .url
            .ok_or_else(|| BillingError::ProviderError("checkout session has no url".to_string()))?;

        Ok(CheckoutSession {
            session_id: session.id,
            url,
        })
    }

    #[instrument(skip(self))]
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, BillingError> {
        debug!(customer_id = %customer_id, "Creating portal session");

        let form = [("customer", customer_id), ("return_url", return_url)];

        let session: StripeBillingPortalSession = self
            .stripe_request(
                reqwest::Method::POST,
                "/billing_portal/sessions",
                Some(&form),
            )
            .await?;

        Ok(session.url)
    }

    #[instrument(skip(self))]
    async fn cancel_at_period_end(
        &self,
        subscription_id: &str,
    ) -> Result<Option<DateTime<Utc>>, BillingError> {
        debug!(subscription_id = %subscription_id, "Scheduling cancellation at period end");

        let form = [("cancel_at_period_end", "true")];
        let sub: StripeSubscription = self
            .stripe_request(
                reqwest::Method::POST,
                &format!("/subscriptions/{subscription_id}"),
                Some(&form),
            )
            .await?;

        Ok(sub
            .current_period_end
            .and_then(|ts| DateTime::from_timestamp(ts, 0)))
    }

    #[instrument(skip(self))]
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), BillingError> {
        debug!(subscription_id = %subscription_id, "Canceling subscription");

        let _: StripeSubscription = self
            .stripe_request(
                reqwest::Method::DELETE,
                &format!("/subscriptions/{subscription_id}"),
                None,
            )
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn latest_charge(
        &self,
        customer_id: &str,
    ) -> Result<Option<ChargeSummary>, BillingError> {
        debug!(customer_id = %customer_id, "Listing charges");

        let params = [("customer", customer_id), ("limit", "1")];
        let charges: StripeList<StripeCharge> = self
            .stripe_request(reqwest::Method::GET, "/charges", Some(&params))
            .await?;

        Ok(charges.data.into_iter().next().map(|c| ChargeSummary {
            id: c.id,
            amount_cents: c.amount,
        }))
    }

    #[instrument(skip(self))]
    async fn create_refund(&self, charge_id: &str) -> Result<RefundReceipt, BillingError> {
        debug!(charge_id = %charge_id, "Creating refund");

        let form = [("charge", charge_id)];
        let refund: StripeRefund = self
            .stripe_request(reqwest::Method::POST, "/refunds", Some(&form))
            .await?;

        Ok(RefundReceipt {
            id: refund.id,
            amount_cents: refund.amount,
        })
    }
}

// Stripe API response types

/// Stripe customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCustomer {
    /// Customer ID
    pub id: String,
}

/// Stripe subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeSubscription {
    /// Subscription ID
    pub id: String,
    /// Customer ID
    pub customer: String,
    /// Subscription status
    pub status: String,
    /// Current period end (Unix timestamp)
    #[serde(default)]
    pub current_period_end: Option<i64>,
    /// Scheduled cancellation (Unix timestamp)
    #[serde(default)]
    pub cancel_at: Option<i64>,
}

/// Stripe checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCheckoutSession {
    /// Session ID
    pub id: String,
    /// Checkout URL
    pub url: Option<String>,
}

/// Stripe billing portal session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeBillingPortalSession {
    /// Portal URL
    pub url: String,
}

/// Stripe charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCharge {
    /// Charge ID
    pub id: String,
    /// Amount in cents
    pub amount: i64,
}

/// Stripe refund
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeRefund {
    /// Refund ID
    pub id: String,
    /// Amount refunded in cents
    pub amount: i64,
}

/// Stripe list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeList<T> {
    /// List data
    pub data: Vec<T>,
}
