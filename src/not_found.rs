//! The fallback response for unknown routes.

use axum::{http::StatusCode, response::Response};

use crate::internal_server_error::render_error;

/// Fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    render_error(StatusCode::NOT_FOUND, "Not found")
}
