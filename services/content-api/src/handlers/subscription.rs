//! Subscription handlers
//!
//! Everything here is self-serve. Status changes made by Stripe arrive
//! through the webhook, not through these routes.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use cleanclip_types::{Plan, PlanInterval, SubscriptionSummary};

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::handlers::shared::{
    record_op_duration, required_field, validate_string_length, MAX_REASON_LEN,
};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub price_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefundRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefundResponse {
    pub success: bool,
    pub refund_id: String,
    /// Refunded amount in dollars
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct PortalResponse {
    pub portal_url: String,
}

#[derive(Debug, Serialize)]
pub struct PricesResponse {
    pub monthly: Option<Plan>,
    pub yearly: Option<Plan>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /subscription/status
pub async fn get_status(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<SubscriptionSummary>> {
    let start = Instant::now();

    let result = state.billing.get_subscription_status(user.user_id()).await;
    record_op_duration("subscription_status", start, result.is_ok());

    Ok(Json(result?))
}

/// POST /subscription/checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    let start = Instant::now();
    let price_id = required_field(req.price_id.as_deref(), "price_id")?;

    let config = state.billing.config();
    let result = state
        .billing
        .create_checkout(&user.0, price_id, &config.success_url, &config.cancel_url)
        .await;
    record_op_duration("create_checkout", start, result.is_ok());

    let session = result?;
    tracing::info!(user_id = %user.user_id(), price_id = %price_id, "Checkout session created");

    Ok(Json(CheckoutResponse {
        checkout_url: session.url,
    }))
}

/// POST /subscription/cancel
///
/// Cancels at the end of the paid period; access continues until then.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<CancelResponse>> {
    let start = Instant::now();

    let result = state.billing.cancel_subscription(user.user_id()).await;
    record_op_duration("cancel_subscription", start, result.is_ok());

    Ok(Json(CancelResponse {
        success: true,
        ends_at: result?.ends_at,
    }))
}

/// POST /subscription/refund
///
/// The body is optional; `{"reason": "..."}` is recorded with the refund.
pub async fn refund(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> ApiResult<Json<RefundResponse>> {
    let start = Instant::now();

    let req: RefundRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RefundRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))?
    };
    let reason = req
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if let Some(reason) = &reason {
        validate_string_length(reason, "reason", MAX_REASON_LEN)?;
    }

    let result = state.billing.request_refund(user.user_id(), reason).await;
    record_op_duration("request_refund", start, result.is_ok());

    let outcome = result?;
    Ok(Json(RefundResponse {
        success: true,
        amount: outcome.amount(),
        refund_id: outcome.refund_id,
    }))
}

/// GET /subscription/portal
pub async fn portal(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<PortalResponse>> {
    let start = Instant::now();

    let return_url = &state.billing.config().portal_return_url;
    let result = state
        .billing
        .create_portal_session(user.user_id(), return_url)
        .await;
    record_op_duration("billing_portal", start, result.is_ok());

    Ok(Json(PortalResponse {
        portal_url: result?,
    }))
}

/// GET /subscription/prices
pub async fn prices(State(state): State<AppState>) -> Json<PricesResponse> {
    let plans = state.billing.prices();
    let pick = |interval| plans.iter().find(|p| p.interval == interval).cloned();

    Json(PricesResponse {
        monthly: pick(PlanInterval::Month),
        yearly: pick(PlanInterval::Year),
    })
}
