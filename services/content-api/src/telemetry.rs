//! Logging and Prometheus setup

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("content_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

/// Install the Prometheus recorder and describe our metrics
pub fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Most requests are one or two indexed queries; Stripe calls dominate the tail
    let latency_buckets = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("api_operation_duration_seconds".to_string()),
            latency_buckets,
        )?
        .install_recorder()?;

    metrics::describe_counter!(
        "content_deliveries_total",
        "Daily content requests by outcome (existing, new, race_resolved, unavailable)"
    );
    metrics::describe_counter!(
        "content_pool_resets_total",
        "Times a user's delivery history was cleared after exhausting the pool"
    );
    metrics::describe_counter!(
        "billing_webhooks_processed_total",
        "Stripe webhooks by processing status"
    );
    metrics::describe_counter!("billing_refunds_total", "Self-serve refunds issued");
    metrics::describe_histogram!(
        "api_operation_duration_seconds",
        "API operation latency in seconds by operation and result"
    );

    Ok(handle)
}
