//! JSON error bodies for failed requests.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The body sent to the client when a request fails.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A short, static description of what failed.
    pub error: String,
}

/// Render a JSON error body with the given status code.
pub fn render_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_owned(),
        }),
    )
        .into_response()
}

/// Render a 500 response with `message` as the error body.
pub fn render_internal_server_error(message: &str) -> Response {
    render_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}
