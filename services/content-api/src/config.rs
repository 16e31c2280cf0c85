//! Configuration for the Content API service.

use std::time::Duration;

use axum::http::HeaderValue;
use cleanclip_auth_core::AuthConfig;
use cleanclip_billing_core::BillingConfig;
use cleanclip_db::PoolOptions;

/// Content API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Connection pool tuning
    pub db: PoolOptions,
    /// Apply the schema on startup
    pub run_migrations: bool,
    /// Billing core configuration
    pub billing: BillingConfig,
    /// Identity provider configuration
    pub auth: AuthConfig,
    /// Allowed CORS origins; empty allows any
    pub cors_allowed_origins: Vec<HeaderValue>,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            var(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let parsed = |key: &'static str, default: &str| {
            var(key)
                .unwrap_or_else(|| default.to_string())
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid(key))
        };
        let flag = |key: &'static str, default: bool| {
            var(key).map_or(default, |v| {
                matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
            })
        };

        // Database
        let database_url = required("DATABASE_URL")?;
        let max_connections = u32::try_from(parsed("DB_MAX_CONNECTIONS", "10")?)
            .map_err(|_| ConfigError::Invalid("DB_MAX_CONNECTIONS"))?;
        let run_migrations = flag("RUN_MIGRATIONS", false);

        // Server
        let http_port = u16::try_from(parsed("HTTP_PORT", "8080")?)
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;
        let request_timeout_secs = parsed("REQUEST_TIMEOUT_SECS", "30")?;

        // Stripe
        let stripe_secret_key = required("STRIPE_SECRET_KEY")?;
        let stripe_webhook_secret = required("STRIPE_WEBHOOK_SECRET")?;
        let refund_window_days = i64::try_from(parsed("REFUND_WINDOW_DAYS", "7")?)
            .map_err(|_| ConfigError::Invalid("REFUND_WINDOW_DAYS"))?;
        let app_base_url =
            var("APP_BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_string());

        let billing = BillingConfig::new(stripe_secret_key, stripe_webhook_secret)
            .with_prices(var("STRIPE_PRICE_MONTHLY"), var("STRIPE_PRICE_YEARLY"))
            .with_refund_window_days(refund_window_days)
            .with_app_base_url(&app_base_url);

        // Identity provider
        let auth = AuthConfig::new(required("AUTH_URL")?, required("AUTH_API_KEY")?);

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| ConfigError::Invalid("CORS_ALLOWED_ORIGINS"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            http_port,
            database_url,
            db: PoolOptions {
                max_connections,
                ..PoolOptions::default()
            },
            run_migrations,
            billing,
            auth,
            cors_allowed_origins,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled: flag("METRICS_ENABLED", true),
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
