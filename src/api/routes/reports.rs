//! Report Routes
//!
//! - GET /api/v1/reports/popularity[?format=chart] - Quantity per food
//! - GET /api/v1/reports/timeline[?staff=NAME] - Staff shift timeline

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{PopularityParams, TimelineParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::report::{popularity_report, shift_timeline, PopularityChart, ShiftTimeline};

/// GET /api/v1/reports/popularity
pub async fn popularity(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PopularityParams>,
) -> ApiResult<Response> {
    let rows = popularity_report(&state.store).await?;

    match params.format.as_deref().map(str::to_lowercase).as_deref() {
        None | Some("rows") => Ok(Json(rows).into_response()),
        Some("chart") => Ok(Json(PopularityChart::from(rows.as_slice())).into_response()),
        Some(other) => Err(ApiError::Validation(format!(
            "Invalid format: {}. Use rows or chart",
            other
        ))),
    }
}

/// GET /api/v1/reports/timeline
pub async fn timeline(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimelineParams>,
) -> ApiResult<Json<ShiftTimeline>> {
    let staff = params.staff.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if let Some(name) = staff {
        let known = state
            .store
            .staff()
            .await?
            .iter()
            .any(|s| s.staff_name == name);
        if !known {
            return Err(ApiError::NotFound(format!("staff '{}'", name)));
        }
    }

    let timeline = shift_timeline(&state.store, staff, state.event.visible_hours()).await?;
    Ok(Json(timeline))
}
