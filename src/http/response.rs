//! Error responses of the proxy.
//!
//! Read routes answer 500 on failure, write routes 400. Rejected arguments
//! are always 400 since retrying them cannot help.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::SideshiftError;

/// `{"error": <label>, "details": <message>}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub label: &'static str,
    pub details: String,
}

impl ApiError {
    /// Failure of a read route.
    pub fn read(label: &'static str, err: SideshiftError) -> Self {
        Self::from_error(label, err, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Failure of a write route.
    pub fn write(label: &'static str, err: SideshiftError) -> Self {
        Self::from_error(label, err, StatusCode::BAD_REQUEST)
    }

    fn from_error(label: &'static str, err: SideshiftError, fallback: StatusCode) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            fallback
        };
        tracing::warn!(
            status = status.as_u16(),
            upstream_status = ?err.status(),
            error = %err,
            "{label}"
        );
        Self {
            status,
            label,
            details: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.label, "details": self.details });
        (self.status, Json(body)).into_response()
    }
}
