//! A REST API for exploring e-commerce transaction records.
//!
//! The server seeds a SQLite database from a remote JSON dataset and serves
//! month-filtered listings, summary statistics, a price histogram and a
//! category distribution for a dashboard client.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{http::StatusCode, response::Response};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod internal_server_error;
mod logging;
mod month;
mod not_found;
mod pagination;
mod routing;
mod seed;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::MonthFilterMode;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, parse_seed_documents};
pub use transaction::{Transaction, TransactionBuilder, insert_transactions};

use crate::internal_server_error::{render_error, render_internal_server_error};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The month query parameter did not name a calendar month.
    ///
    /// Accepted values are full month names, three-letter abbreviations and
    /// month numbers from 1 to 12.
    #[error("\"{0}\" is not a valid month")]
    InvalidMonth(String),

    /// The query string could not be read, e.g. a page number that is not a
    /// number.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A document could not be converted into a transaction.
    ///
    /// The string describes which document was rejected and why.
    #[error("invalid transaction record: {0}")]
    InvalidRecord(String),

    /// The seed dataset could not be downloaded or decoded.
    #[error("could not fetch seed data: {0}")]
    SeedFetch(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl Error {
    /// Convert the error into a JSON error response for a route.
    ///
    /// Malformed input is reported back to the client as a bad request.
    /// Every other error is logged and replaced with the route's static
    /// `failure_message`, so internal details never reach the client.
    pub(crate) fn into_json_response(self, failure_message: &str) -> Response {
        match self {
            Error::InvalidMonth(_) | Error::InvalidQuery(_) => {
                render_error(StatusCode::BAD_REQUEST, &self.to_string())
            }
            error => {
                tracing::error!("{failure_message}: {error}");
                render_internal_server_error(failure_message)
            }
        }
    }
}
