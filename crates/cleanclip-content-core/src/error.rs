//! Content errors

use cleanclip_db::DbError;
use cleanclip_types::ServiceType;
use thiserror::Error;

/// Content rotation errors
#[derive(Error, Debug)]
pub enum ContentError {
    /// No active template exists for the service type, even after a pool reset
    #[error("no content available for service type {service_type}")]
    ContentUnavailable {
        /// Service type whose catalog is empty
        service_type: ServiceType,
    },

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

/// Profile management errors
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Unknown service type name
    #[error("invalid service type: {0}")]
    InvalidServiceType(String),

    /// Not an IANA timezone name
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The identity carries no email, so no user record can be created
    #[error("account has no email address")]
    MissingEmail,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl ProfileError {
    /// Whether the error was caused by caller input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidServiceType(_) | Self::InvalidTimezone(_) | Self::MissingEmail
        )
    }
}
