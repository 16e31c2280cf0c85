//! Daily content handlers

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use tracing::instrument;

use cleanclip_types::{DailyContent, DeliveryStats};

use crate::error::ApiResult;
use crate::extract::SubscribedUser;
use crate::handlers::shared::record_op_duration;
use crate::state::AppState;

/// GET /content/today
///
/// One piece of content per user per local day; repeated calls return the
/// same content.
#[instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn get_today(
    State(state): State<AppState>,
    user: SubscribedUser,
) -> ApiResult<Json<DailyContent>> {
    let start = Instant::now();

    let result = state.content.get_daily_content(user.user_id()).await;
    record_op_duration("content_today", start, result.is_ok());

    Ok(Json(result?))
}

/// GET /content/stats
#[instrument(skip_all, fields(user_id = %user.user_id()))]
pub async fn get_stats(
    State(state): State<AppState>,
    user: SubscribedUser,
) -> ApiResult<Json<DeliveryStats>> {
    let start = Instant::now();

    let result = state.content.get_delivery_stats(user.user_id()).await;
    record_op_duration("content_stats", start, result.is_ok());

    Ok(Json(result?))
}
