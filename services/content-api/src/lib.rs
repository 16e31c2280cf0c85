//! Cleanclip Content API
//!
//! ## Content (active or trialing subscription)
//!
//! - `GET /content/today` - Today's script, caption, and CTA
//! - `GET /content/stats` - Rotation progress
//!
//! ## Subscription
//!
//! - `GET /subscription/status` - Status and refund eligibility
//! - `POST /subscription/checkout` - Start a Stripe checkout
//! - `POST /subscription/cancel` - Cancel at period end
//! - `POST /subscription/refund` - One-time self-serve refund
//! - `GET /subscription/portal` - Stripe billing portal link
//! - `GET /subscription/prices` - Plan list (no auth)
//!
//! ## Profile
//!
//! - `GET /user/profile` - Service type and timezone
//! - `POST /user/onboard` - Initial setup
//! - `PUT /user/service-type` - Switch content category
//! - `PUT /user/timezone` - Change when "today" rolls over
//!
//! ## Other
//!
//! - `POST /webhooks/stripe` - Stripe subscription events
//! - `GET /health`, `GET /ready`, `GET /metrics` - Probes and Prometheus

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;
pub mod telemetry;

use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{content, health, profile, ready, subscription, webhook};
use crate::state::AppState;

/// Build the HTTP router
pub fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    let content_routes = Router::new()
        .route("/content/today", get(content::get_today))
        .route("/content/stats", get(content::get_stats));

    let subscription_routes = Router::new()
        .route("/subscription/status", get(subscription::get_status))
        .route("/subscription/checkout", post(subscription::create_checkout))
        .route("/subscription/cancel", post(subscription::cancel))
        .route("/subscription/refund", post(subscription::refund))
        .route("/subscription/portal", get(subscription::portal))
        .route("/subscription/prices", get(subscription::prices));

    let user_routes = Router::new()
        .route("/user/profile", get(profile::get_profile))
        .route("/user/onboard", post(profile::onboard))
        .route("/user/service-type", put(profile::update_service_type))
        .route("/user/timezone", put(profile::update_timezone));

    // Webhook route (raw body, signature checked before parsing)
    let webhook_routes = Router::new().route("/webhooks/stripe", post(webhook::stripe_webhook));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let allow_origin = if state.config.cors_allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(state.config.cors_allowed_origins.iter().cloned())
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    // Outermost first
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .merge(content_routes)
        .merge(subscription_routes)
        .merge(user_routes)
        .merge(webhook_routes)
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}
