use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{CatalogEntry, ErrorCode};
use crate::response::{ErrorResponse, ErrorTag, HandledError};
use crate::status::resolve_status;

/// An error raised by business logic, backed by a catalog entry.
///
/// Return it through `Result` and `?` up to the dispatcher; it carries
/// everything needed to build the response.
#[derive(Debug, Clone, Error)]
#[error("{} (code {})", .entry.message, .entry.code)]
pub struct AppError {
    entry: &'static CatalogEntry,
    details: Option<Value>,
    status: StatusCode,
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        Self::create(code.entry(), None, None)
    }

    /// Build from a catalog entry. `details` is stored as given; the status
    /// comes from the code range unless `status_override` is set.
    pub fn create(
        entry: &'static CatalogEntry,
        details: Option<Value>,
        status_override: Option<StatusCode>,
    ) -> Self {
        Self {
            entry,
            details,
            status: resolve_status(entry.code, status_override),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn entry(&self) -> &'static CatalogEntry {
        self.entry
    }

    pub fn code(&self) -> u16 {
        self.entry.code
    }

    pub fn user_message(&self) -> &'static str {
        self.entry.user_message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorTag::AppError,
            code: self.entry.code,
            message: self.entry.user_message.to_string(),
            details: self.details.clone(),
        }
    }

    pub fn to_handled(&self) -> HandledError {
        HandledError {
            status: self.status,
            body: self.to_response(),
        }
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_handled().into_response()
    }
}
