//! Scripted payment provider for testing

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cleanclip_billing_core::{BillingError, ChargeSummary, PaymentProvider, RefundReceipt};
use cleanclip_types::{CheckoutSession, CustomerId};
use dashmap::DashMap;

/// Payment provider that records calls and answers from in-memory state
#[derive(Default)]
pub struct MockPaymentProvider {
    /// customer id -> latest charge
    charges: DashMap<String, ChargeSummary>,
    customers_created: AtomicUsize,
    canceled_now: Mutex<Vec<String>>,
    canceled_at_period_end: Mutex<Vec<String>>,
    refunded_charges: Mutex<Vec<String>>,
    period_end: Mutex<Option<DateTime<Utc>>>,
    fail_immediate_cancel: AtomicBool,
}

impl MockPaymentProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_charge(&self, customer_id: &str, charge_id: &str, amount_cents: i64) {
        self.charges.insert(
            customer_id.to_string(),
            ChargeSummary {
                id: charge_id.to_string(),
                amount_cents,
            },
        );
    }

    #[allow(dead_code)]
    pub fn set_period_end(&self, end: DateTime<Utc>) {
        *self.period_end.lock().unwrap() = Some(end);
    }

    #[allow(dead_code)]
    pub fn fail_immediate_cancel(&self) {
        self.fail_immediate_cancel.store(true, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn customers_created(&self) -> usize {
        self.customers_created.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn canceled_now(&self) -> Vec<String> {
        self.canceled_now.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn canceled_at_period_end(&self) -> Vec<String> {
        self.canceled_at_period_end.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn refunded_charges(&self) -> Vec<String> {
        self.refunded_charges.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(
        &self,
        _email: &str,
        user_id: &str,
    ) -> Result<CustomerId, BillingError> {
        self.customers_created.fetch_add(1, Ordering::SeqCst);
        Ok(CustomerId::new(format!("cus_{user_id}")))
    }

    async fn create_checkout_session(
        &self,
        customer_id: &str,
        price_id: &str,
        _success_url: &str,
        _cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError> {
        Ok(CheckoutSession {
            session_id: format!("cs_{customer_id}"),
            url: format!("https://checkout.stripe.test/{customer_id}/{price_id}"),
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<String, BillingError> {
        Ok(format!("https://billing.stripe.test/{customer_id}?return={return_url}"))
    }

    async fn cancel_at_period_end(
        &self,
        subscription_id: &str,
    ) -> Result<Option<DateTime<Utc>>, BillingError> {
        self.canceled_at_period_end
            .lock()
            .unwrap()
            .push(subscription_id.to_string());
        Ok(*self.period_end.lock().unwrap())
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), BillingError> {
        if self.fail_immediate_cancel.load(Ordering::SeqCst) {
            return Err(BillingError::ProviderError("Stripe API error: 503".to_string()));
        }
        self.canceled_now
            .lock()
            .unwrap()
            .push(subscription_id.to_string());
        Ok(())
    }

    async fn latest_charge(
        &self,
        customer_id: &str,
    ) -> Result<Option<ChargeSummary>, BillingError> {
        Ok(self.charges.get(customer_id).map(|c| c.value().clone()))
    }

    async fn create_refund(&self, charge_id: &str) -> Result<RefundReceipt, BillingError> {
        let amount_cents = self
            .charges
            .iter()
            .find(|c| c.id == charge_id)
            .map(|c| c.amount_cents)
            .ok_or_else(|| BillingError::ProviderError("no such charge".to_string()))?;
        self.refunded_charges
            .lock()
            .unwrap()
            .push(charge_id.to_string());
        Ok(RefundReceipt {
            id: format!("re_{charge_id}"),
            amount_cents,
        })
    }
}
