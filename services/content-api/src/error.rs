//! Error types for the Content API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use cleanclip_auth_core::AuthError;
use cleanclip_billing_core::BillingError;
use cleanclip_content_core::{ContentError, ProfileError};
use cleanclip_db::DbError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Active subscription required")]
    SubscriptionRequired,

    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    #[error("Refund not available: {0}")]
    RefundIneligible(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::SubscriptionRequired => StatusCode::PAYMENT_REQUIRED,
            Self::RefundIneligible(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ContentUnavailable(_) | Self::UpstreamFailure(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::SubscriptionRequired => "SUBSCRIPTION_REQUIRED",
            Self::ContentUnavailable(_) => "CONTENT_UNAVAILABLE",
            Self::RefundIneligible(_) => "REFUND_INELIGIBLE",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::UpstreamFailure(_) => "UPSTREAM_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show the caller
    fn public_message(&self) -> String {
        match self {
            Self::UpstreamFailure(_) => "A dependent service is unavailable".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.public_message(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(e) => Self::UpstreamFailure(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::InvalidToken => {
                Self::Unauthenticated(err.to_string())
            }
            AuthError::Provider(msg) => Self::UpstreamFailure(msg),
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::ContentUnavailable { .. } => Self::ContentUnavailable(err.to_string()),
            ContentError::Database(e) => e.into(),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Database(e) => e.into(),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::UserNotFound => Self::NotFound(err.to_string()),
            BillingError::RefundIneligible => Self::RefundIneligible(
                "refunds are available once, within the refund window".to_string(),
            ),
            BillingError::SubscriptionRequired => Self::SubscriptionRequired,
            BillingError::NoActiveSubscription
            | BillingError::NoBillingAccount
            | BillingError::NoChargeFound
            | BillingError::InvalidPrice(_)
            | BillingError::WebhookError(_) => Self::BadRequest(err.to_string()),
            BillingError::ProviderError(msg) => Self::UpstreamFailure(msg),
            BillingError::Database(e) => e.into(),
            BillingError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
