//! Shared handler utilities
//!
//! Input validation and metrics helpers used across handlers.

use std::time::Instant;

use crate::error::ApiError;

/// Maximum length for user-provided strings
const MAX_STRING_LEN: usize = 256;

/// Maximum length for a refund reason
pub const MAX_REASON_LEN: usize = 500;

/// Require a present, non-blank field no longer than `MAX_STRING_LEN`.
pub fn required_field<'a>(value: Option<&'a str>, field_name: &str) -> Result<&'a str, ApiError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{field_name} is required")))?;
    validate_string_length(value, field_name, MAX_STRING_LEN)?;
    Ok(value)
}

/// Validate a user-provided string is within safe bounds.
pub fn validate_string_length(value: &str, field_name: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::BadRequest(format!(
            "{field_name} too long (max {max} chars)"
        )));
    }
    Ok(())
}

/// Record HTTP operation duration with result label.
///
/// Labels: operation, result (ok/err)
#[inline]
pub fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "api_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}
