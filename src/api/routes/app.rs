//! App Shell Route
//!
//! - GET /api/v1/app - Navigation groups, steps and their widgets

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::AppResponse;
use crate::api::state::AppState;
use crate::app::navigation;

/// GET /api/v1/app
pub async fn get_navigation(State(state): State<Arc<AppState>>) -> Json<AppResponse> {
    Json(AppResponse {
        navigation: navigation(state.event.name.clone()),
        event: state.event.window(),
    })
}
