//! HTTP surface.
//!
//! Routes:
//! - `GET /health`        liveness probe
//! - `GET /metrics`       Prometheus text format
//! - `GET /errors`        catalog listing
//! - `GET /errors/:name`  single catalog entry
//!
//! Every other path answers with the catalog's `NOT_FOUND` body.

pub mod catalog;
pub mod headers;
pub mod health;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::app_error::AppError;
use crate::catalog::ErrorCode;
use crate::error::ServiceError;
use crate::handler::{translate_unrecoverable, ErrorHandler};
use crate::metrics::ErrorMetrics;
use crate::reporting::ErrorLogger;
use crate::response::HandledError;
use catalog::CatalogDocument;

#[derive(Clone)]
pub struct AppState {
    pub handler: ErrorHandler,
    pub metrics: Arc<ErrorMetrics>,
    pub catalog: Arc<CatalogDocument>,
}

impl AppState {
    pub fn new(logger: ErrorLogger, metrics: Arc<ErrorMetrics>) -> Result<Self, ServiceError> {
        Ok(Self {
            handler: ErrorHandler::new(logger).with_metrics(metrics.clone()),
            metrics,
            catalog: Arc::new(CatalogDocument::build()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(render_metrics))
        .route("/errors", get(catalog::list_catalog))
        .route("/errors/:name", get(catalog::get_entry))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            body,
        )
            .into_response(),
        Err(err) => {
            state
                .handler
                .logger()
                .log_error(&err, Some(json!({ "route": "/metrics" })));
            translate_unrecoverable().into_response()
        }
    }
}

async fn not_found(State(state): State<AppState>, uri: Uri) -> HandledError {
    state
        .handler
        .handle(AppError::new(ErrorCode::NotFound).with_details(json!({ "path": uri.path() })))
}
