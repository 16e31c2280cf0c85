//! Common error types

use thiserror::Error;

/// A string did not name a known enum variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// What was being parsed (e.g. "service type")
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Content template validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Caption exceeds the maximum length
    #[error("caption too long: {len} chars (max {max})")]
    CaptionTooLong {
        /// Actual length in characters
        len: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// A required text field is empty
    #[error("template field is empty: {0}")]
    EmptyField(&'static str),

    /// Unknown service type
    #[error(transparent)]
    ServiceType(#[from] ParseEnumError),
}

/// Timezone name is not a valid IANA zone
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid timezone: {0}")]
pub struct InvalidTimezone(pub String);
