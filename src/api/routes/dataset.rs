//! Dataset Routes
//!
//! Whole-dataset operations.
//!
//! - POST /api/v1/seed[?reset=true] - Load the demo dataset
//! - DELETE /api/v1/dataset - Delete every row
//! - GET /api/v1/export[?table=T&format=csv|json] - Export dataset or one table
//! - POST /api/v1/import - Insert a dataset document atomically

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DatasetResponse, ExportParams, SeedParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::ApiJson;
use crate::api::routes::tables::parse_table;
use crate::api::state::AppState;
use crate::seed::load_sample_data;
use crate::store::{Dataset, DatasetCounts};
use crate::table::{export_csv, load_grid};

fn dataset_response(counts: DatasetCounts) -> Json<DatasetResponse> {
    Json(DatasetResponse {
        status: "ok".to_string(),
        counts,
    })
}

/// POST /api/v1/seed
pub async fn seed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeedParams>,
) -> ApiResult<(StatusCode, Json<DatasetResponse>)> {
    let summary = load_sample_data(&state.store, params.reset).await?;
    Ok((StatusCode::CREATED, dataset_response(summary.counts)))
}

/// DELETE /api/v1/dataset
pub async fn reset_dataset(State(state): State<Arc<AppState>>) -> ApiResult<Json<DatasetResponse>> {
    state.store.reset().await?;
    Ok(dataset_response(state.store.counts().await?))
}

/// POST /api/v1/import
pub async fn import_dataset(
    State(state): State<Arc<AppState>>,
    ApiJson(dataset): ApiJson<Dataset>,
) -> ApiResult<(StatusCode, Json<DatasetResponse>)> {
    if dataset.is_empty() {
        return Err(ApiError::Validation("dataset contains no rows".to_string()));
    }
    let counts = state.store.insert_dataset(&dataset).await?;
    Ok((StatusCode::CREATED, dataset_response(counts)))
}

/// GET /api/v1/export
pub async fn export(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let format = params.format.to_lowercase();
    let table = params.table.as_deref().map(parse_table).transpose()?;

    match (table, format.as_str()) {
        (None, "json") => Ok(Json(state.store.export_dataset().await?).into_response()),
        (None, "csv") => Err(ApiError::Validation(
            "CSV export needs a table parameter".to_string(),
        )),
        (Some(table), "json") => Ok(Json(load_grid(&state.store, table).await?).into_response()),
        (Some(table), "csv") => {
            let body = export_csv(&state.store, table).await?;
            let disposition = format!("attachment; filename=\"{}.csv\"", table.sql_name());
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response())
        }
        (_, other) => Err(ApiError::Validation(format!(
            "Invalid format: {}. Use json or csv",
            other
        ))),
    }
}
