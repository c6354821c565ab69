//! Application error catalog and HTTP error translation.
//!
//! Business code returns [`AppError`]s built from catalog keys; the
//! [`ErrorHandler`] turns those, database driver errors, validation errors
//! and anything else into a status code and a uniform JSON body.

pub mod api;
pub mod app_error;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod reporting;
pub mod response;
pub mod status;

// These modules are only needed by the binary.
pub mod cli;
pub mod logging;

pub use app_error::AppError;
pub use catalog::{CatalogEntry, Category, ErrorCode};
pub use classify::{Caught, ClassificationTag, DriverError, ValidationError};
pub use error::ServiceError;
pub use handler::ErrorHandler;
pub use reporting::{ErrorLogger, ErrorReporter};
pub use response::{ErrorResponse, HandledError};
pub use status::resolve_status;
