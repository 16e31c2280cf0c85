//! Configuration types for identity resolution

use std::time::Duration;

/// Identity provider configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the hosted auth service (e.g., https://xyz.supabase.co)
    pub auth_url: String,
    /// Public API key sent alongside the bearer token
    pub api_key: String,
    /// How long a verified token stays cached
    pub cache_ttl: Duration,
    /// Maximum number of cached tokens
    pub cache_capacity: u64,
    /// Total request timeout for the provider call
    pub request_timeout: Duration,
}

impl AuthConfig {
    /// Create a new auth config
    pub fn new(auth_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 10_000,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Get the user lookup URL
    pub fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.auth_url)
    }

    /// Set cache TTL
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set cache capacity
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
