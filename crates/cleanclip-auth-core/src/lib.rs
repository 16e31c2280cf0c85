//! Cleanclip Auth Core - Caller identity resolution
//!
//! Resolves a bearer credential into an [`Identity`](cleanclip_types::Identity)
//! by asking the hosted identity provider, with a short-lived cache in front.

pub mod cache;
pub mod config;
pub mod error;
pub mod provider;

pub use cache::CachingIdentityProvider;
pub use config::AuthConfig;
pub use error::AuthError;
pub use provider::{HostedIdentityProvider, IdentityProvider};
