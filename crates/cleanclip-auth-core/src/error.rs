//! Auth errors

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// No bearer credential on the request
    #[error("missing credentials")]
    MissingCredentials,

    /// The provider rejected the credential
    #[error("invalid token")]
    InvalidToken,

    /// The provider could not be reached or answered unexpectedly
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredentials | Self::InvalidToken => 401,
            Self::Provider(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Provider(_) => "UPSTREAM_FAILURE",
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Provider(err.to_string())
    }
}
