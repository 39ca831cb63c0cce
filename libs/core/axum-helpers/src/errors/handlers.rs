use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, error_response, messages};

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, messages::NOT_FOUND_ROUTE, ErrorCode::NotFound)
}

/// Fallback for a known path hit with the wrong verb.
pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        messages::METHOD_NOT_ALLOWED,
        ErrorCode::BadRequest,
    )
}
