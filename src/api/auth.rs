//! API key middleware
//!
//! Every `/api/v1` request must carry the configured public key in
//! `x-api-key` and the private key in `x-api-secret`.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_SECRET_HEADER: &str = "x-api-secret";

const MAX_KEY_LEN: usize = 256;

fn normalized_header_value(headers: &HeaderMap, key: &str, max_len: usize) -> Option<String> {
    let raw = headers.get(key)?.to_str().ok()?.trim();
    if raw.is_empty() || raw.len() > max_len {
        return None;
    }
    Some(raw.to_string())
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Reject requests without matching API keys
pub async fn require_api_keys(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = req.headers();

    let Some(public_key) = normalized_header_value(headers, API_KEY_HEADER, MAX_KEY_LEN) else {
        return Err(ApiError::Unauthorized(format!("missing {} header", API_KEY_HEADER)));
    };
    let Some(private_key) = normalized_header_value(headers, API_SECRET_HEADER, MAX_KEY_LEN) else {
        return Err(ApiError::Unauthorized(format!(
            "missing {} header",
            API_SECRET_HEADER
        )));
    };

    let public_ok =
        constant_time_eq(public_key.as_bytes(), state.credentials.public_key.as_bytes());
    let private_ok =
        constant_time_eq(private_key.as_bytes(), state.credentials.private_key.as_bytes());
    if !(public_ok && private_ok) {
        return Err(ApiError::Unauthorized("invalid API keys".to_string()));
    }

    Ok(next.run(req).await)
}
