//! Axum extractors for authentication and the subscription gate

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;

use cleanclip_auth_core::AuthError;
use cleanclip_types::{Identity, SubscriptionStatus, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// Caller verified by the identity provider
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn user_id(&self) -> &UserId {
        &self.0.id
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(parts)?;

        let identity = app_state.identity.verify(token).await.map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            ApiError::from(e)
        })?;

        Ok(Self(identity))
    }
}

/// Caller whose subscription grants access to content
#[derive(Debug, Clone)]
pub struct SubscribedUser {
    pub identity: Identity,
    pub status: SubscriptionStatus,
}

impl SubscribedUser {
    pub fn user_id(&self) -> &UserId {
        &self.identity.id
    }
}

impl<S> FromRequestParts<S> for SubscribedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let status = app_state.billing.require_active(&identity.id).await?;
        Ok(Self { identity, status })
    }
}

/// Bearer credential from the Authorization header
pub fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::MissingCredentials.into()),
    }
}
