//! Profile handlers: service type and timezone

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use cleanclip_content_core::OnboardRequest;
use cleanclip_types::{Profile, DEFAULT_TIMEZONE};

use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::handlers::shared::{record_op_duration, required_field};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub service_type: String,
    pub timezone: String,
    pub onboarding_completed: bool,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            service_type: profile.service_type.to_string(),
            timezone: profile.timezone.to_string(),
            onboarding_completed: profile.onboarding_completed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OnboardBody {
    pub service_type: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OnboardResponse {
    pub success: bool,
    pub service_type: String,
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct ServiceTypeBody {
    pub service_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceTypeResponse {
    pub success: bool,
    pub service_type: String,
}

#[derive(Debug, Deserialize)]
pub struct TimezoneBody {
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimezoneResponse {
    pub success: bool,
    pub timezone: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let start = Instant::now();

    let result = state.profiles.get_profile(user.user_id()).await;
    record_op_duration("get_profile", start, result.is_ok());

    Ok(Json(result?.into()))
}

/// POST /user/onboard
pub async fn onboard(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<OnboardBody>,
) -> ApiResult<Json<OnboardResponse>> {
    let start = Instant::now();

    let service_type = required_field(body.service_type.as_deref(), "service_type")?;
    let timezone = match body.timezone.as_deref() {
        None => DEFAULT_TIMEZONE,
        Some(tz) => required_field(Some(tz), "timezone")?,
    };

    let result = state
        .profiles
        .onboard(
            &user.0,
            OnboardRequest {
                service_type: service_type.to_string(),
                timezone: timezone.to_string(),
            },
        )
        .await;
    record_op_duration("onboard", start, result.is_ok());

    let profile = result?;
    Ok(Json(OnboardResponse {
        success: true,
        service_type: profile.service_type.to_string(),
        timezone: profile.timezone.to_string(),
    }))
}

/// PUT /user/service-type
///
/// Takes effect on the next content request; delivery history is kept.
pub async fn update_service_type(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ServiceTypeBody>,
) -> ApiResult<Json<ServiceTypeResponse>> {
    let start = Instant::now();
    let service_type = required_field(body.service_type.as_deref(), "service_type")?;

    let result = state
        .profiles
        .update_service_type(&user.0, service_type)
        .await;
    record_op_duration("update_service_type", start, result.is_ok());

    Ok(Json(ServiceTypeResponse {
        success: true,
        service_type: result?.to_string(),
    }))
}

/// PUT /user/timezone
pub async fn update_timezone(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<TimezoneBody>,
) -> ApiResult<Json<TimezoneResponse>> {
    let start = Instant::now();
    let timezone = required_field(body.timezone.as_deref(), "timezone")?;

    let result = state.profiles.update_timezone(&user.0, timezone).await;
    record_op_duration("update_timezone", start, result.is_ok());

    Ok(Json(TimezoneResponse {
        success: true,
        timezone: result?.to_string(),
    }))
}
