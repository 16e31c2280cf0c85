//! Stripe webhook handler

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use std::time::Instant;

use crate::error::{ApiError, ApiResult};
use crate::handlers::shared::record_op_duration;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /webhooks/stripe
///
/// Verified events are acknowledged even when no local user matches, so
/// Stripe does not keep retrying them.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAck>> {
    let start = Instant::now();

    let signature = headers
        .get("stripe-signature")
        .ok_or_else(|| {
            tracing::warn!("Missing Stripe-Signature header");
            ApiError::BadRequest("Missing Stripe-Signature header".into())
        })?
        .to_str()
        .map_err(|_| ApiError::BadRequest("Invalid Stripe-Signature header encoding".into()))?;

    let result = state.billing.process_webhook(&body, signature).await;
    record_op_duration("process_webhook", start, result.is_ok());

    match result {
        Ok(_) => Ok(Json(WebhookAck { received: true })),
        Err(e) => {
            tracing::warn!(error = %e, "Webhook processing failed");
            Err(e.into())
        }
    }
}
