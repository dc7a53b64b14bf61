//! Store error types
//!
//! Defines all errors that can occur in the dataset store.

use crate::table::Table;
use thiserror::Error;

/// Errors that can occur in the dataset store
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite operation failed
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A unique key is already taken (station title, food title, staff name)
    #[error("Duplicate {table}: '{key}' already exists")]
    Duplicate { table: Table, key: String },

    /// A row refers to a station, food or staff member that does not exist
    #[error("Dangling reference: {table}.{field} '{value}' does not match any {target}")]
    DanglingReference {
        table: Table,
        field: &'static str,
        value: String,
        target: Table,
    },

    /// A row violates a field constraint
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation requires an empty dataset
    #[error("Dataset is not empty; reset it first")]
    NotEmpty,
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Duplicate {
            table: Table::Station,
            key: "Vietnamese Stall".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate station: 'Vietnamese Stall' already exists"
        );

        let err = StoreError::DanglingReference {
            table: Table::Order,
            field: "food",
            value: "Sushi".to_string(),
            target: Table::Food,
        };
        assert_eq!(
            err.to_string(),
            "Dangling reference: order.food 'Sushi' does not match any food"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
    }
}
