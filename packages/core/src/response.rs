//! Wire shapes returned to API consumers.
//!
//! The HTTP status travels beside the body, never inside it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind tag carried in the `error` field of every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorTag {
    /// A catalogued error, whether raised directly or mapped from a
    /// driver or validation failure.
    AppError,
    /// An unclassified failure, reported with a generic message.
    InternalError,
}

/// JSON body returned for every error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorTag,
    pub code: u16,
    /// User-facing text from the catalog.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Result of dispatching a caught error: a status and a body.
#[derive(Debug, Clone, PartialEq)]
pub struct HandledError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for HandledError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
