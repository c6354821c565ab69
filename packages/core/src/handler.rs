//! Dispatch entry point: caught error in, `{status, body}` out.
//!
//! Application, driver and validation errors are expected outcomes and are
//! translated silently. Only unrecoverable errors are logged, and their
//! response never carries the original error text.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::app_error::AppError;
use crate::catalog::ErrorCode;
use crate::classify::{BoxError, Caught, DriverError, DriverErrorKind, ValidationError};
use crate::metrics::ErrorMetrics;
use crate::reporting::ErrorLogger;
use crate::response::{ErrorResponse, ErrorTag, HandledError};

/// Detail attached to foreign-key violations.
pub const RELATED_RESOURCE_NOT_FOUND: &str = "related resource not found";

#[derive(Clone, Default)]
pub struct ErrorHandler {
    logger: ErrorLogger,
    metrics: Option<Arc<ErrorMetrics>>,
}

impl ErrorHandler {
    pub fn new(logger: ErrorLogger) -> Self {
        Self {
            logger,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<ErrorMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn logger(&self) -> &ErrorLogger {
        &self.logger
    }

    pub fn handle(&self, caught: impl Into<Caught>) -> HandledError {
        self.handle_with_context(caught, None)
    }

    /// Like [`handle`](Self::handle), attaching `context` to the log entry
    /// if the error turns out to be unrecoverable.
    pub fn handle_with_context(
        &self,
        caught: impl Into<Caught>,
        context: Option<Value>,
    ) -> HandledError {
        let caught = caught.into();
        let tag = caught.tag();

        let handled = match caught {
            Caught::Application(err) => translate_application(&err),
            Caught::Driver(err) => translate_driver(&err),
            Caught::Validation(err) => translate_validation(&err),
            Caught::Unrecoverable(err) => {
                self.logger.log_error(err.as_ref(), context);
                translate_unrecoverable()
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record(tag, handled.status);
        }

        handled
    }

    /// Classify a type-erased error, then handle it.
    pub fn handle_boxed(&self, err: BoxError) -> HandledError {
        self.handle(Caught::classify(err))
    }
}

pub fn translate_application(err: &AppError) -> HandledError {
    err.to_handled()
}

pub fn translate_driver(err: &DriverError) -> HandledError {
    let app = match err.kind() {
        DriverErrorKind::AuthPolicyViolation => AppError::new(ErrorCode::Unauthorized),
        DriverErrorKind::UniqueViolation => AppError::new(ErrorCode::AlreadyExists),
        DriverErrorKind::ForeignKeyViolation => AppError::new(ErrorCode::ValidationError)
            .with_details(json!({ "message": RELATED_RESOURCE_NOT_FOUND })),
        DriverErrorKind::Other => AppError::new(ErrorCode::DatabaseError),
    };
    app.to_handled()
}

pub fn translate_validation(err: &ValidationError) -> HandledError {
    AppError::new(ErrorCode::ValidationError)
        .with_details(json!({ "fields": err.fields() }))
        .to_handled()
}

pub fn translate_unrecoverable() -> HandledError {
    let entry = ErrorCode::InternalError.entry();
    HandledError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorResponse {
            error: ErrorTag::InternalError,
            code: entry.code,
            message: entry.user_message.to_string(),
            details: None,
        },
    }
}
