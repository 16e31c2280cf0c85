//! Router harness for HTTP-level tests
//!
//! The pool connects lazily to an unreachable address, so these tests cover
//! everything that is decided before the database is touched: auth,
//! signature checks, and input validation.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use cleanclip_auth_core::{AuthError, IdentityProvider};
use cleanclip_types::{FixedClock, Identity, UserId};
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use sha2::Sha256;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use content_api::build_router;
use content_api::config::Config;
use content_api::state::AppState;

pub const VALID_TOKEN: &str = "valid-token";
pub const WEBHOOK_SECRET: &str = "whsec_http_test_secret";
pub const PRICE_MONTHLY: &str = "price_monthly_http";
pub const PRICE_YEARLY: &str = "price_yearly_http";

/// Accepts a single fixed token
pub struct StubIdentityProvider;

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let id = UserId(Uuid::from_u128(0x5eed));
        if token == VALID_TOKEN {
            Ok(Identity {
                id,
                email: Some("owner@sparkle-cleaning.test".to_string()),
            })
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap()
}

pub fn app() -> Router {
    let vars = HashMap::from([
        ("DATABASE_URL", "postgres://cleanclip@127.0.0.1:1/cleanclip"),
        ("STRIPE_SECRET_KEY", "sk_test_http"),
        ("STRIPE_WEBHOOK_SECRET", WEBHOOK_SECRET),
        ("STRIPE_PRICE_MONTHLY", PRICE_MONTHLY),
        ("STRIPE_PRICE_YEARLY", PRICE_YEARLY),
        ("AUTH_URL", "http://127.0.0.1:1"),
        ("AUTH_API_KEY", "anon"),
    ]);
    let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy(&config.database_url)
        .unwrap();

    let state = AppState::new(
        pool,
        Arc::new(StubIdentityProvider),
        Arc::new(FixedClock::new(now())),
        config,
    );
    build_router(state, None)
}

pub async fn send(request: Request<Body>) -> Response<Body> {
    app().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the error envelope and return its code
pub async fn error_code(response: Response<Body>, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let body = json_body(response).await;
    assert!(body["error"]["message"].is_string(), "{body}");
    body["error"]["code"].as_str().unwrap().to_string()
}

pub fn authed(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {VALID_TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn sign(payload: &str, ts: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(format!("{ts}.{payload}").as_bytes());
    format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
}
