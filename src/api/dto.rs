//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::app::Navigation;
use crate::store::{DatasetCounts, EventWindow};
use crate::table::{Column, Table};

// ============================================
// APP DTOs
// ============================================

/// Navigation shell plus the event it describes
#[derive(Debug, Serialize)]
pub struct AppResponse {
    #[serde(flatten)]
    pub navigation: Navigation,
    pub event: EventWindow,
}

// ============================================
// RECORD DTOs
// ============================================

/// Response to a batch insert
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertResponse {
    /// Status: "ok"
    pub status: String,
    pub table: Table,
    /// Number of rows inserted
    pub inserted: usize,
    /// Store-assigned ids, in request order
    pub ids: Vec<i64>,
}

// ============================================
// TABLE DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub tables: Vec<Table>,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub table: Table,
    pub columns: Vec<Column>,
}

// ============================================
// REPORT DTOs
// ============================================

/// Query parameters for the popularity report
#[derive(Debug, Default, Deserialize)]
pub struct PopularityParams {
    /// "rows" (default) or "chart"
    #[serde(default)]
    pub format: Option<String>,
}

/// Query parameters for the timeline report
#[derive(Debug, Default, Deserialize)]
pub struct TimelineParams {
    /// Only shifts of this staff member
    #[serde(default)]
    pub staff: Option<String>,
}

// ============================================
// DATASET DTOs
// ============================================

/// Query parameters for seeding
#[derive(Debug, Default, Deserialize)]
pub struct SeedParams {
    /// Replace existing rows instead of failing
    #[serde(default)]
    pub reset: bool,
}

/// Response to seed, import and reset
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetResponse {
    /// Status: "ok"
    pub status: String,
    /// Row counts after the operation
    pub counts: DatasetCounts,
}

/// Query parameters for export
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Single table to export; whole dataset when absent
    #[serde(default)]
    pub table: Option<String>,
    /// "json" (default) or "csv"
    #[serde(default = "default_export_format")]
    pub format: String,
}

fn default_export_format() -> String {
    "json".to_string()
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Store status
    pub store: String,
    /// Row counts, absent when the store cannot be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<DatasetCounts>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
