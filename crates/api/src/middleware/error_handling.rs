//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! endpoint reports failures the same way.
//!
//! A lost slot claim is reported as `409 Conflict` with the stable code
//! `slot_unavailable`, which lets clients tell "slot taken, pick another"
//! apart from other conflicts.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use timeline_core::errors::TimelineError;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use timeline_api::middleware::error_handling::AppError;
/// use timeline_core::errors::TimelineError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(TimelineError::NotFound("record".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TimelineError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TimelineError::NotFound(_) => StatusCode::NOT_FOUND,
            TimelineError::Validation(_) => StatusCode::BAD_REQUEST,
            TimelineError::Conflict(_) => StatusCode::CONFLICT,
            TimelineError::SlotUnavailable { .. } => StatusCode::CONFLICT,
            TimelineError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            TimelineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TimelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self.0, "request failed");
        }

        let body = Json(json!({
            "error": self.0.to_string(),
            "code": self.0.code(),
        }));

        (status, body).into_response()
    }
}

/// Allows `?` on functions returning `TimelineResult` inside handlers.
impl From<TimelineError> for AppError {
    fn from(err: TimelineError) -> Self {
        AppError(err)
    }
}

/// Wraps bare eyre reports as store failures.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TimelineError::Database(err))
    }
}
