//! Read-only catalog endpoints.
//!
//! Front-ends use these to render user messages by code without shipping
//! their own copy of the catalog.
//!
//! Routes:
//! - `GET /errors`        all entries, with `ETag` / `If-None-Match` support
//! - `GET /errors/:name`  one entry, by symbolic name or numeric code

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::headers::{catalog_cache_control, etag_for, not_modified};
use super::AppState;
use crate::app_error::AppError;
use crate::catalog::{Category, ErrorCode};
use crate::error::ServiceError;
use crate::response::HandledError;
use crate::status::resolve_status;

/// Public view of one catalog entry. The internal message is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogView {
    pub name: String,
    pub code: u16,
    pub category: Option<Category>,
    pub status: u16,
    pub user_message: String,
}

impl From<ErrorCode> for CatalogView {
    fn from(key: ErrorCode) -> Self {
        let entry = key.entry();
        Self {
            name: entry.name.to_string(),
            code: entry.code,
            category: entry.category(),
            status: resolve_status(entry.code, None).as_u16(),
            user_message: entry.user_message.to_string(),
        }
    }
}

/// Pre-rendered `GET /errors` body and its ETag.
#[derive(Debug, Clone)]
pub struct CatalogDocument {
    body: Bytes,
    etag: String,
    etag_header: HeaderValue,
}

impl CatalogDocument {
    pub fn build() -> Result<Self, ServiceError> {
        let views: Vec<CatalogView> = ErrorCode::ALL.iter().copied().map(CatalogView::from).collect();
        let body = serde_json::to_vec(&views).map_err(|err| ServiceError::Parse(err.to_string()))?;
        let etag = etag_for(&body);
        let etag_header =
            HeaderValue::from_str(&etag).map_err(|err| ServiceError::Parse(err.to_string()))?;

        Ok(Self {
            body: Bytes::from(body),
            etag,
            etag_header,
        })
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }
}

/// `GET /errors`: the full catalog.
pub async fn list_catalog(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let doc = &state.catalog;

    if not_modified(&headers, doc.etag()) {
        return (
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, doc.etag_header.clone())],
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::ETAG, doc.etag_header.clone()),
            (header::CACHE_CONTROL, catalog_cache_control()),
        ],
        doc.body.clone(),
    )
        .into_response()
}

/// `GET /errors/:name`: one entry. Unknown keys go through the dispatcher
/// as `NOT_FOUND`.
pub async fn get_entry(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CatalogView>, HandledError> {
    let key = match name.parse::<u16>() {
        Ok(code) => ErrorCode::from_code(code),
        Err(_) => ErrorCode::from_name(&name.to_ascii_uppercase()),
    };

    match key {
        Some(key) => Ok(Json(CatalogView::from(key))),
        None => Err(state
            .handler
            .handle(AppError::new(ErrorCode::NotFound).with_details(json!({ "name": name })))),
    }
}
