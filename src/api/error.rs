//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body over the size limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Missing or wrong API keys
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Dataset store error
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status and stable error code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Store(e) => match e {
                StoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                StoreError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
                StoreError::DanglingReference { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "DANGLING_REFERENCE")
                }
                StoreError::NotEmpty => (StatusCode::CONFLICT, "DATASET_NOT_EMPTY"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            },
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn test_store_error_mapping() {
        let duplicate = ApiError::from(StoreError::Duplicate {
            table: Table::Station,
            key: "Vietnamese Stall".to_string(),
        });
        assert_eq!(
            duplicate.status_and_code(),
            (StatusCode::CONFLICT, "DUPLICATE")
        );

        let dangling = ApiError::from(StoreError::DanglingReference {
            table: Table::Order,
            field: "food",
            value: "Sushi".to_string(),
            target: Table::Food,
        });
        assert_eq!(dangling.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(
            ApiError::from(StoreError::NotEmpty).status_and_code(),
            (StatusCode::CONFLICT, "DATASET_NOT_EMPTY")
        );
        assert_eq!(
            ApiError::from(StoreError::Validation("bad".into())).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::Unauthorized("missing x-api-key".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::NotFound("staff 'Nobody'".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::PayloadTooLarge("length limit exceeded".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
