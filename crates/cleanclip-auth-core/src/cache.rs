//! Short-lived verification cache
//!
//! Tokens are keyed by their SHA-256 digest so raw credentials never sit in
//! memory longer than the request. Only successful verifications are cached.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use sha2::{Digest, Sha256};

use cleanclip_types::Identity;

use crate::{AuthConfig, AuthError, IdentityProvider};

/// Identity provider wrapper that caches verified tokens
pub struct CachingIdentityProvider<P: IdentityProvider> {
    inner: Arc<P>,
    cache: Cache<String, Identity>,
}

impl<P: IdentityProvider> CachingIdentityProvider<P> {
    /// Wrap a provider using the cache settings from config
    pub fn new(inner: Arc<P>, config: &AuthConfig) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .time_to_live(config.cache_ttl)
                .max_capacity(config.cache_capacity)
                .build(),
        }
    }

    fn cache_key(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}

#[async_trait]
impl<P: IdentityProvider> IdentityProvider for CachingIdentityProvider<P> {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let key = Self::cache_key(token);
        if let Some(identity) = self.cache.get(&key).await {
            return Ok(identity);
        }

        let identity = self.inner.verify(token).await?;
        self.cache.insert(key, identity.clone()).await;
        Ok(identity)
    }
}
