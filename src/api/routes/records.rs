//! Record Routes
//!
//! Batch inserts, one endpoint per record kind. Each takes a JSON array and
//! either inserts every row or none.
//!
//! - POST /api/v1/stations
//! - POST /api/v1/foods
//! - POST /api/v1/orders
//! - POST /api/v1/staff
//! - POST /api/v1/rosters

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::InsertResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ApiJson;
use crate::api::state::AppState;
use crate::store::{NewFood, NewOrder, NewRoster, NewStaff, NewStation};
use crate::table::Table;

type Created = (StatusCode, Json<InsertResponse>);

/// Reject empty and oversized batches before touching the store
fn validate_batch_size(table: Table, len: usize, max: usize) -> ApiResult<()> {
    if len == 0 {
        return Err(ApiError::Validation(format!(
            "{} batch must contain at least one row",
            table
        )));
    }
    if len > max {
        return Err(ApiError::Validation(format!(
            "{} batch has {} rows, limit is {}",
            table, len, max
        )));
    }
    Ok(())
}

fn created(table: Table, ids: Vec<i64>) -> Created {
    tracing::info!(table = %table, rows = ids.len(), "Rows created");
    (
        StatusCode::CREATED,
        Json(InsertResponse {
            status: "ok".to_string(),
            table,
            inserted: ids.len(),
            ids,
        }),
    )
}

/// POST /api/v1/stations
pub async fn create_stations(
    State(state): State<Arc<AppState>>,
    ApiJson(rows): ApiJson<Vec<NewStation>>,
) -> ApiResult<Created> {
    validate_batch_size(Table::Station, rows.len(), state.config.max_batch_rows)?;
    let ids = state.store.insert_stations(&rows).await?;
    Ok(created(Table::Station, ids))
}

/// POST /api/v1/foods
pub async fn create_foods(
    State(state): State<Arc<AppState>>,
    ApiJson(rows): ApiJson<Vec<NewFood>>,
) -> ApiResult<Created> {
    validate_batch_size(Table::Food, rows.len(), state.config.max_batch_rows)?;
    let ids = state.store.insert_foods(&rows).await?;
    Ok(created(Table::Food, ids))
}

/// POST /api/v1/orders
pub async fn create_orders(
    State(state): State<Arc<AppState>>,
    ApiJson(rows): ApiJson<Vec<NewOrder>>,
) -> ApiResult<Created> {
    validate_batch_size(Table::Order, rows.len(), state.config.max_batch_rows)?;
    let ids = state.store.insert_orders(&rows).await?;
    Ok(created(Table::Order, ids))
}

/// POST /api/v1/staff
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    ApiJson(rows): ApiJson<Vec<NewStaff>>,
) -> ApiResult<Created> {
    validate_batch_size(Table::Staff, rows.len(), state.config.max_batch_rows)?;
    let ids = state.store.insert_staff(&rows).await?;
    Ok(created(Table::Staff, ids))
}

/// POST /api/v1/rosters
pub async fn create_rosters(
    State(state): State<Arc<AppState>>,
    ApiJson(rows): ApiJson<Vec<NewRoster>>,
) -> ApiResult<Created> {
    validate_batch_size(Table::Roster, rows.len(), state.config.max_batch_rows)?;
    let ids = state.store.insert_rosters(&rows).await?;
    Ok(created(Table::Roster, ids))
}
