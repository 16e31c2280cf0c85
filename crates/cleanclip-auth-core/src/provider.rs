//! Identity provider abstraction and the hosted-auth implementation

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use cleanclip_types::{Identity, UserId};

use crate::{AuthConfig, AuthError};

/// Resolves a bearer credential into a caller identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify the token and return who it belongs to
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// User payload returned by the hosted auth service
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: Option<String>,
}

/// Hosted identity provider (GoTrue-compatible `/auth/v1/user`)
#[derive(Clone)]
pub struct HostedIdentityProvider {
    config: AuthConfig,
    http_client: reqwest::Client,
}

impl HostedIdentityProvider {
    /// Create a new provider client
    pub fn new(config: AuthConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let response = self
            .http_client
            .get(self.config.user_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity provider request failed: {}", e);
                AuthError::Provider(e.to_string())
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            tracing::debug!("Identity provider rejected token ({})", status);
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            tracing::error!("Identity provider returned {}", status);
            return Err(AuthError::Provider(format!("unexpected status {status}")));
        }

        let user: ProviderUser = response.json().await.map_err(|e| {
            tracing::error!("Malformed identity provider response: {}", e);
            AuthError::Provider(e.to_string())
        })?;

        Ok(Identity {
            id: UserId(user.id),
            email: user.email,
        })
    }
}
