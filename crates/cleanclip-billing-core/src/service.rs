//! Subscription service
//!
//! Local subscription state is only ever written here: by Stripe webhooks,
//! by the one-time refund, and by the customer-id stamp during checkout.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use tracing::{debug, error, info, instrument, warn};

use cleanclip_db::{CreateRefundLog, RefundLogRepository, UserRepository, UserRow};
use cleanclip_types::{
    CancellationOutcome, CheckoutSession, Clock, Identity, Plan, RefundOutcome,
    SubscriptionStatus, SubscriptionSummary, UserId,
};

use crate::webhook::{SubscriptionData, WebhookEventData, WebhookEventType, WebhookHandler};
use crate::{BillingConfig, BillingError, PaymentProvider};

/// Whether a self-serve refund is still possible
///
/// Requires an unused refund, a recorded subscription start, and `now` no
/// later than `window_days` after that start.
pub fn refund_window_open(
    started_at: Option<DateTime<Utc>>,
    refund_used: bool,
    now: DateTime<Utc>,
    window_days: i64,
) -> bool {
    if refund_used {
        return false;
    }
    match started_at {
        Some(start) => now <= start + Duration::days(window_days),
        None => false,
    }
}

/// What a webhook did to local state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Local state was updated
    Applied,
    /// Local state already matched the event
    Unchanged,
    /// No user carries the event's customer id
    UserNotFound,
    /// The event would perform a forbidden status transition
    TransitionRejected,
    /// The event refers to a replaced subscription, or re-creates one already seen
    StaleSubscription,
    /// Event type we do not act on
    Ignored,
}

impl WebhookOutcome {
    /// Metric/log label
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::UserNotFound => "user_not_found",
            Self::TransitionRejected => "transition_rejected",
            Self::StaleSubscription => "stale_subscription",
            Self::Ignored => "ignored",
        }
    }
}

/// Subscription service
pub struct SubscriptionService<U: UserRepository, R: RefundLogRepository, P: PaymentProvider> {
    users: Arc<U>,
    refunds: Arc<R>,
    provider: Arc<P>,
    webhooks: WebhookHandler,
    config: BillingConfig,
    clock: Arc<dyn Clock>,
}

impl<U: UserRepository, R: RefundLogRepository, P: PaymentProvider> SubscriptionService<U, R, P> {
    /// Create a new subscription service
    pub fn new(
        users: Arc<U>,
        refunds: Arc<R>,
        provider: Arc<P>,
        config: BillingConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let webhooks = WebhookHandler::new(config.stripe_webhook_secret.clone())
            .with_tolerance(config.webhook_tolerance_secs);
        Self {
            users,
            refunds,
            provider,
            webhooks,
            config,
            clock,
        }
    }

    /// Billing configuration in use
    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    // =========================================================================
    // Self-serve operations
    // =========================================================================

    /// Current status and refund eligibility
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_subscription_status(
        &self,
        user_id: &UserId,
    ) -> Result<SubscriptionSummary, BillingError> {
        let user = self.load_user(user_id).await?;

        Ok(SubscriptionSummary {
            status: user.status()?,
            started_at: user.subscription_started_at,
            ends_at: user.subscription_ends_at,
            can_refund: self.can_refund(&user),
        })
    }

    /// Start a subscription checkout for one of the two plans
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn create_checkout(
        &self,
        identity: &Identity,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError> {
        if !self.config.is_known_price(price_id) {
            return Err(BillingError::InvalidPrice(price_id.to_string()));
        }

        let user = match self.users.find_by_id(identity.id.0).await? {
            Some(user) => user,
            None => {
                let email = identity.email.as_deref().ok_or(BillingError::UserNotFound)?;
                self.users.ensure(identity.id.0, email).await?
            }
        };

        let customer_id = match user.stripe_customer_id {
            Some(customer_id) => customer_id,
            None => {
                let customer = self
                    .provider
                    .create_customer(&user.email, &user.id.to_string())
                    .await?;
                self.users
                    .update_stripe_customer_id(user.id, customer.as_str())
                    .await?;
                info!(customer_id = %customer, "Created billing customer");
                customer.0
            }
        };

        self.provider
            .create_checkout_session(&customer_id, price_id, success_url, cancel_url)
            .await
    }

    /// Cancel at the end of the paid period. Local status follows via webhook.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn cancel_subscription(
        &self,
        user_id: &UserId,
    ) -> Result<CancellationOutcome, BillingError> {
        let user = self.load_user(user_id).await?;
        let subscription_id = user
            .stripe_subscription_id
            .ok_or(BillingError::NoActiveSubscription)?;

        let ends_at = self.provider.cancel_at_period_end(&subscription_id).await?;
        info!(?ends_at, "Subscription set to cancel at period end");

        Ok(CancellationOutcome { ends_at })
    }

    /// One-time self-serve refund of the latest charge
    ///
    /// The refund flag is persisted as soon as the processor confirms the
    /// refund. The subscription is then canceled immediately, and locally
    /// marked canceled even if the processor cancel fails; that failure is
    /// still returned.
    #[instrument(skip(self, reason), fields(user_id = %user_id))]
    pub async fn request_refund(
        &self,
        user_id: &UserId,
        reason: Option<String>,
    ) -> Result<RefundOutcome, BillingError> {
        let user = self.load_user(user_id).await?;
        if !self.can_refund(&user) {
            debug!(refund_used = user.refund_used, "Refund refused");
            return Err(BillingError::RefundIneligible);
        }

        let customer_id = user
            .stripe_customer_id
            .as_deref()
            .ok_or(BillingError::NoChargeFound)?;
        let charge = self
            .provider
            .latest_charge(customer_id)
            .await?
            .ok_or(BillingError::NoChargeFound)?;

        let receipt = self.provider.create_refund(&charge.id).await?;
        counter!("billing_refunds_total").increment(1);
        info!(refund_id = %receipt.id, amount_cents = receipt.amount_cents, "Refund issued");

        self.users.mark_refund_used(user.id).await?;
        self.refunds
            .create(CreateRefundLog {
                user_id: user.id,
                stripe_refund_id: receipt.id.clone(),
                amount_cents: receipt.amount_cents,
                reason,
            })
            .await?;

        let cancel_result = match user.stripe_subscription_id.as_deref() {
            Some(subscription_id) => self.provider.cancel_subscription(subscription_id).await,
            None => Ok(()),
        };

        self.users
            .update_status(
                user.id,
                SubscriptionStatus::Canceled.as_str(),
                Some(self.clock.now()),
            )
            .await?;

        if let Err(e) = cancel_result {
            error!(error = %e, "Refund issued but subscription cancel failed");
            return Err(e);
        }

        Ok(RefundOutcome {
            refund_id: receipt.id,
            amount_cents: receipt.amount_cents,
        })
    }

    /// Stripe billing portal link
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn create_portal_session(
        &self,
        user_id: &UserId,
        return_url: &str,
    ) -> Result<String, BillingError> {
        let user = self.load_user(user_id).await?;
        let customer_id = user
            .stripe_customer_id
            .ok_or(BillingError::NoBillingAccount)?;

        self.provider
            .create_portal_session(&customer_id, return_url)
            .await
    }

    /// The available plans
    pub fn prices(&self) -> Vec<Plan> {
        self.config.plans()
    }

    /// Gate for paid features: only active and trialing subscriptions pass
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn require_active(
        &self,
        user_id: &UserId,
    ) -> Result<SubscriptionStatus, BillingError> {
        let Some(user) = self.users.find_by_id(user_id.0).await? else {
            return Err(BillingError::SubscriptionRequired);
        };

        let status = user.status()?;
        if status.grants_access() {
            Ok(status)
        } else {
            Err(BillingError::SubscriptionRequired)
        }
    }

    // =========================================================================
    // Webhooks
    // =========================================================================

    /// Verify, parse, and apply a Stripe webhook delivery
    #[instrument(skip(self, payload, signature))]
    pub async fn process_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookOutcome, BillingError> {
        let event = match self
            .webhooks
            .verify_and_parse_at(payload, signature, self.clock.now())
        {
            Ok(event) => event,
            Err(e) => {
                counter!("billing_webhooks_processed_total", "status" => "rejected").increment(1);
                return Err(e);
            }
        };

        let outcome = match (&event.event_type, &event.data) {
            (WebhookEventType::CustomerSubscriptionCreated, WebhookEventData::Subscription(d)) => {
                self.on_subscription_created(d).await?
            }
            (WebhookEventType::CustomerSubscriptionUpdated, WebhookEventData::Subscription(d)) => {
                self.on_subscription_updated(d).await?
            }
            (WebhookEventType::CustomerSubscriptionDeleted, WebhookEventData::Subscription(d)) => {
                self.on_subscription_deleted(d).await?
            }
            (other, _) => {
                debug!(event_type = %other.as_str(), "Ignoring webhook event");
                WebhookOutcome::Ignored
            }
        };

        counter!("billing_webhooks_processed_total", "status" => outcome.as_str()).increment(1);
        info!(
            event_id = %event.id,
            event_type = %event.event_type.as_str(),
            outcome = outcome.as_str(),
            "Webhook processed"
        );
        Ok(outcome)
    }

    /// `customer.subscription.created`: activate and stamp the start time
    ///
    /// Only a subscription id no webhook has mentioned before starts a new
    /// lifecycle. A created event for the stored subscription that arrives
    /// after its updates fills in a missing start time and leaves the status
    /// alone.
    #[instrument(skip(self, data), fields(customer_id = %data.customer_id))]
    pub async fn on_subscription_created(
        &self,
        data: &SubscriptionData,
    ) -> Result<WebhookOutcome, BillingError> {
        let Some(user) = self.user_for_customer(&data.customer_id).await? else {
            return Ok(WebhookOutcome::UserNotFound);
        };
        let current = user.status()?;
        let first_seen = self
            .users
            .remember_subscription(user.id, &data.subscription_id)
            .await?;

        if user.stripe_subscription_id.as_deref() == Some(data.subscription_id.as_str()) {
            if user.subscription_started_at.is_some() {
                return Ok(WebhookOutcome::Unchanged);
            }
            if current == SubscriptionStatus::Canceled {
                warn!("Ignoring created event for a finished subscription");
                return Ok(WebhookOutcome::TransitionRejected);
            }
            self.users
                .start_subscription(
                    user.id,
                    &data.subscription_id,
                    current.as_str(),
                    self.clock.now(),
                )
                .await?;
            info!(
                subscription_id = %data.subscription_id,
                status = %current,
                "Subscription start recorded"
            );
            return Ok(WebhookOutcome::Applied);
        }

        if !first_seen {
            warn!(
                subscription_id = %data.subscription_id,
                current = ?user.stripe_subscription_id,
                "Ignoring created event for a subscription seen before"
            );
            return Ok(WebhookOutcome::StaleSubscription);
        }

        self.users
            .start_subscription(
                user.id,
                &data.subscription_id,
                SubscriptionStatus::Active.as_str(),
                self.clock.now(),
            )
            .await?;
        info!(subscription_id = %data.subscription_id, "Subscription activated");
        Ok(WebhookOutcome::Applied)
    }

    /// `customer.subscription.updated`: follow the processor status
    #[instrument(skip(self, data), fields(customer_id = %data.customer_id))]
    pub async fn on_subscription_updated(
        &self,
        data: &SubscriptionData,
    ) -> Result<WebhookOutcome, BillingError> {
        let Some(user) = self.user_for_customer(&data.customer_id).await? else {
            return Ok(WebhookOutcome::UserNotFound);
        };
        self.users
            .remember_subscription(user.id, &data.subscription_id)
            .await?;
        if Self::is_stale(&user, data) {
            return Ok(WebhookOutcome::StaleSubscription);
        }

        let current = user.status()?;
        let target = SubscriptionStatus::from_processor_status(&data.status);

        if current == target {
            return Ok(WebhookOutcome::Unchanged);
        }
        if !current.can_transition_to(target) {
            warn!(from = %current, to = %target, "Ignoring forbidden status transition");
            return Ok(WebhookOutcome::TransitionRejected);
        }

        let ends_at = match target {
            SubscriptionStatus::Canceled => data.cancel_at,
            _ => None,
        };
        self.users
            .sync_subscription(user.id, &data.subscription_id, target.as_str(), ends_at)
            .await?;
        info!(from = %current, to = %target, "Subscription status updated");
        Ok(WebhookOutcome::Applied)
    }

    /// `customer.subscription.deleted`: force canceled
    #[instrument(skip(self, data), fields(customer_id = %data.customer_id))]
    pub async fn on_subscription_deleted(
        &self,
        data: &SubscriptionData,
    ) -> Result<WebhookOutcome, BillingError> {
        let Some(user) = self.user_for_customer(&data.customer_id).await? else {
            return Ok(WebhookOutcome::UserNotFound);
        };
        self.users
            .remember_subscription(user.id, &data.subscription_id)
            .await?;
        if Self::is_stale(&user, data) {
            return Ok(WebhookOutcome::StaleSubscription);
        }

        if user.status()? == SubscriptionStatus::Canceled {
            return Ok(WebhookOutcome::Unchanged);
        }

        self.users
            .sync_subscription(
                user.id,
                &data.subscription_id,
                SubscriptionStatus::Canceled.as_str(),
                Some(self.clock.now()),
            )
            .await?;
        info!(subscription_id = %data.subscription_id, "Subscription canceled");
        Ok(WebhookOutcome::Applied)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load_user(&self, user_id: &UserId) -> Result<UserRow, BillingError> {
        self.users
            .find_by_id(user_id.0)
            .await?
            .ok_or(BillingError::UserNotFound)
    }

    async fn user_for_customer(&self, customer_id: &str) -> Result<Option<UserRow>, BillingError> {
        let user = self.users.find_by_stripe_customer_id(customer_id).await?;
        if user.is_none() {
            warn!(customer_id = %customer_id, "Webhook for unknown customer dropped");
        }
        Ok(user)
    }

    fn can_refund(&self, user: &UserRow) -> bool {
        refund_window_open(
            user.subscription_started_at,
            user.refund_used,
            self.clock.now(),
            self.config.refund_window_days,
        )
    }

    /// An event about a subscription the user has since replaced
    fn is_stale(user: &UserRow, data: &SubscriptionData) -> bool {
        match user.stripe_subscription_id.as_deref() {
            Some(current) if current != data.subscription_id => {
                debug!(
                    current = %current,
                    event = %data.subscription_id,
                    "Ignoring event for replaced subscription"
                );
                true
            }
            _ => false,
        }
    }
}
