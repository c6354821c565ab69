use axum::http::StatusCode;

/// Resolve the HTTP status for a catalog code.
///
/// A caller-supplied override always wins. Otherwise the thousand-wide code
/// range decides; anything unmapped falls through to 500.
pub fn resolve_status(code: u16, status_override: Option<StatusCode>) -> StatusCode {
    if let Some(status) = status_override {
        return status;
    }

    match code {
        1000..=1999 => StatusCode::UNAUTHORIZED,
        2000..=2999 => StatusCode::FORBIDDEN,
        3000..=3999 => StatusCode::BAD_REQUEST,
        4000 => StatusCode::NOT_FOUND,
        4001..=4999 => StatusCode::CONFLICT,
        5000..=5999 => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
