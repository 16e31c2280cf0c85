//! Stripe webhook handling

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, error, instrument, warn};

use crate::error::BillingError;
use crate::stripe::StripeSubscription;

/// Default allowed age of a webhook signature, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Webhook event types we handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    /// Customer subscription created
    CustomerSubscriptionCreated,
    /// Customer subscription updated
    CustomerSubscriptionUpdated,
    /// Customer subscription deleted
    CustomerSubscriptionDeleted,
    /// Unknown event type
    Unknown(String),
}

impl From<&str> for WebhookEventType {
    fn from(s: &str) -> Self {
        match s {
            "customer.subscription.created" => Self::CustomerSubscriptionCreated,
            "customer.subscription.updated" => Self::CustomerSubscriptionUpdated,
            "customer.subscription.deleted" => Self::CustomerSubscriptionDeleted,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl WebhookEventType {
    /// Metric/log label
    pub fn as_str(&self) -> &str {
        match self {
            Self::CustomerSubscriptionCreated => "customer.subscription.created",
            Self::CustomerSubscriptionUpdated => "customer.subscription.updated",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
            Self::Unknown(other) => other,
        }
    }
}

/// Parsed webhook event
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Event ID
    pub id: String,
    /// Event type
    pub event_type: WebhookEventType,
    /// Event data
    pub data: WebhookEventData,
}

/// Webhook event data
#[derive(Debug, Clone)]
pub enum WebhookEventData {
    /// Subscription data
    Subscription(SubscriptionData),
    /// Raw JSON for unknown events
    Raw(serde_json::Value),
}

/// Subscription event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionData {
    /// Subscription ID
    pub subscription_id: String,
    /// Customer ID
    pub customer_id: String,
    /// Processor status string
    pub status: String,
    /// Scheduled cancellation time
    pub cancel_at: Option<DateTime<Utc>>,
}

/// Webhook handler for processing Stripe events
#[derive(Clone)]
pub struct WebhookHandler {
    webhook_secret: String,
    tolerance_secs: i64,
}

impl WebhookHandler {
    /// Create a new webhook handler
    pub fn new(webhook_secret: impl Into<String>) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Override the signature age tolerance
    pub fn with_tolerance(mut self, secs: i64) -> Self {
        self.tolerance_secs = secs;
        self
    }

    /// Verify and parse a webhook payload as of `now`
    #[instrument(skip(self, payload, signature))]
    pub fn verify_and_parse_at(
        &self,
        payload: &[u8],
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<WebhookEvent, BillingError> {
        self.verify_signature(payload, signature, now.timestamp())?;

        let raw_event: RawStripeEvent = serde_json::from_slice(payload)
            .map_err(|e| BillingError::WebhookError(e.to_string()))?;

        debug!(event_id = %raw_event.id, event_type = %raw_event.event_type, "Parsed webhook event");

        let event_type = WebhookEventType::from(raw_event.event_type.as_str());
        let data = Self::parse_event_data(&event_type, raw_event.data.object)?;

        Ok(WebhookEvent {
            id: raw_event.id,
            event_type,
            data,
        })
    }

    /// Verify Stripe webhook signature
    fn verify_signature(
        &self,
        payload: &[u8],
        signature: &str,
        now: i64,
    ) -> Result<(), BillingError> {
        // Header format: t=timestamp,v1=signature[,v1=signature...]
        let mut timestamp: Option<&str> = None;
        let mut candidates: Vec<&str> = Vec::new();

        for part in signature.split(',') {
            if let Some((key, value)) = part.trim().split_once('=') {
                match key {
                    "t" => timestamp = Some(value),
                    "v1" => candidates.push(value),
                    _ => {}
                }
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            warn!("Missing timestamp in webhook signature");
            BillingError::WebhookError("Missing timestamp".to_string())
        })?;

        if candidates.is_empty() {
            warn!("Missing v1 signature in webhook signature");
            return Err(BillingError::WebhookError("Missing signature".to_string()));
        }

        let payload = std::str::from_utf8(payload)
            .map_err(|_| BillingError::WebhookError("Invalid payload encoding".to_string()))?;
        let signed_payload = format!("{timestamp}.{payload}");

        let mut mac = Hmac::<Sha256>::new_from_slice(self.webhook_secret.as_bytes())
            .map_err(|_| BillingError::Internal("HMAC error".to_string()))?;
        mac.update(signed_payload.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        let matched = candidates
            .iter()
            .any(|sig| constant_time_eq(sig.as_bytes(), expected.as_bytes()));
        if !matched {
            error!("Webhook signature verification failed");
            return Err(BillingError::WebhookError(
                "Signature verification failed".to_string(),
            ));
        }

        let ts: i64 = timestamp
            .parse()
            .map_err(|_| BillingError::WebhookError("Invalid timestamp format".to_string()))?;
        if (now - ts).abs() > self.tolerance_secs {
            warn!(timestamp = ts, now = now, "Webhook timestamp outside tolerance");
            return Err(BillingError::WebhookError("Timestamp too old".to_string()));
        }

        Ok(())
    }

    /// Parse event data based on type
    fn parse_event_data(
        event_type: &WebhookEventType,
        object: serde_json::Value,
    ) -> Result<WebhookEventData, BillingError> {
        match event_type {
            WebhookEventType::CustomerSubscriptionCreated
            | WebhookEventType::CustomerSubscriptionUpdated
            | WebhookEventType::CustomerSubscriptionDeleted => {
                let sub: StripeSubscription = serde_json::from_value(object)
                    .map_err(|e| BillingError::WebhookError(e.to_string()))?;
                Ok(WebhookEventData::Subscription(SubscriptionData {
                    subscription_id: sub.id,
                    customer_id: sub.customer,
                    status: sub.status,
                    cancel_at: sub.cancel_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
                }))
            }
            WebhookEventType::Unknown(_) => Ok(WebhookEventData::Raw(object)),
        }
    }
}

/// Constant-time comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0, |acc, (x, y)| acc | (x ^ y)) == 0
}

// Raw Stripe event for parsing
#[derive(Debug, Deserialize)]
struct RawStripeEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: RawEventData,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    object: serde_json::Value,
}
