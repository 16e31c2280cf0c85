//! Common test utilities for cleanclip-billing-core integration tests

pub mod mock_provider;
pub mod mock_repos;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use cleanclip_billing_core::{BillingConfig, SubscriptionService};
use cleanclip_types::FixedClock;
use hmac::{Hmac, Mac};
use sha2::Sha256;

#[allow(unused_imports)]
pub use mock_provider::MockPaymentProvider;
#[allow(unused_imports)]
pub use mock_repos::InMemoryBillingStore;

pub const WEBHOOK_SECRET: &str = "whsec_test_secret_for_integration_tests";
pub const PRICE_MONTHLY: &str = "price_monthly_test";
pub const PRICE_YEARLY: &str = "price_yearly_test";

pub type TestService =
    SubscriptionService<InMemoryBillingStore, InMemoryBillingStore, MockPaymentProvider>;

/// Everything a billing test needs
pub struct Harness {
    pub store: Arc<InMemoryBillingStore>,
    pub provider: Arc<MockPaymentProvider>,
    pub clock: FixedClock,
    pub service: TestService,
}

pub fn harness(now: DateTime<Utc>) -> Harness {
    let store = InMemoryBillingStore::new();
    let provider = MockPaymentProvider::new();
    let clock = FixedClock::new(now);
    let config = BillingConfig::new("sk_test", WEBHOOK_SECRET)
        .with_prices(Some(PRICE_MONTHLY.into()), Some(PRICE_YEARLY.into()))
        .with_refund_window_days(7);
    let service = SubscriptionService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&provider),
        config,
        Arc::new(clock.clone()),
    );
    Harness {
        store,
        provider,
        clock,
        service,
    }
}

#[allow(dead_code)]
pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// Build a `Stripe-Signature` header for `payload` signed at `ts`
#[allow(dead_code)]
pub fn sign(payload: &str, ts: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(format!("{ts}.{payload}").as_bytes());
    format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
}

/// A subscription event payload
#[allow(dead_code)]
pub fn subscription_event(
    kind: &str,
    subscription_id: &str,
    customer_id: &str,
    status: &str,
    cancel_at: Option<i64>,
) -> String {
    serde_json::json!({
        "id": format!("evt_{subscription_id}_{kind}"),
        "type": kind,
        "created": 1_700_000_000,
        "data": {"object": {
            "id": subscription_id,
            "customer": customer_id,
            "status": status,
            "cancel_at": cancel_at,
            "cancel_at_period_end": false
        }}
    })
    .to_string()
}
