//! Table Routes
//!
//! - GET /api/v1/tables - Table names
//! - GET /api/v1/tables/:table/schema - Columns of one table
//! - GET /api/v1/tables/:table - Grid view: columns plus every row

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{SchemaResponse, TablesResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::table::{load_grid, GridView, Table};

/// Resolve a table path segment, 404 when unknown
pub(crate) fn parse_table(name: &str) -> ApiResult<Table> {
    name.parse()
        .map_err(|_| ApiError::NotFound(format!("table '{}'", name)))
}

/// GET /api/v1/tables
pub async fn list_tables() -> Json<TablesResponse> {
    Json(TablesResponse {
        tables: Table::all().to_vec(),
    })
}

/// GET /api/v1/tables/:table/schema
pub async fn table_schema(Path(name): Path<String>) -> ApiResult<Json<SchemaResponse>> {
    let table = parse_table(&name)?;
    Ok(Json(SchemaResponse {
        table,
        columns: table.columns().to_vec(),
    }))
}

/// GET /api/v1/tables/:table
pub async fn table_grid(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<GridView>> {
    let table = parse_table(&name)?;
    let grid = load_grid(&state.store, table).await?;
    Ok(Json(grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table() {
        assert_eq!(parse_table("rosters").unwrap(), Table::Roster);
        assert!(matches!(parse_table("entries"), Err(ApiError::NotFound(_))));
    }
}
