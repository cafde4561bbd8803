//! Loads the transaction dataset into the database.
//!
//! The dataset is a JSON array of transaction-shaped objects served from a
//! fixed URL. Seeding appends to whatever is already stored, so seeding twice
//! duplicates every record.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::Value;

use crate::{
    AppState, Error,
    transaction::{TransactionBuilder, insert_transactions},
};

/// The public product transaction dataset.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

const SEED_SUCCESS_MESSAGE: &str = "Database initialized with seed data";
const SEED_FAILURE_MESSAGE: &str = "Error initializing data";

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection to insert into.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client used to download the dataset.
    pub http_client: reqwest::Client,
    /// Where to download the dataset from.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// Download the dataset from `url` as a list of JSON documents.
///
/// # Errors
/// Returns [Error::SeedFetch] if the request fails, the server responds with
/// an error status or the body is not a JSON array.
pub async fn fetch_seed_documents(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Value>, Error> {
    client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::SeedFetch(error.to_string()))?
        .json::<Vec<Value>>()
        .await
        .map_err(|error| Error::SeedFetch(error.to_string()))
}

/// Validate every document before anything is inserted.
///
/// # Errors
/// Returns [Error::InvalidRecord] naming the position of the first document
/// that is not a valid transaction.
pub fn parse_seed_documents(documents: Vec<Value>) -> Result<Vec<TransactionBuilder>, Error> {
    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            TransactionBuilder::from_document(document).map_err(|error| match error {
                Error::InvalidRecord(reason) => {
                    Error::InvalidRecord(format!("document {index}: {reason}"))
                }
                other => other,
            })
        })
        .collect()
}

/// Download the dataset and append it to the database.
///
/// The database lock is only taken once the download has finished.
///
/// # Errors
/// Returns an error if the download fails, a document is invalid or the rows
/// cannot be inserted. Nothing is inserted in any of these cases.
pub async fn seed_database(state: &SeedState) -> Result<usize, Error> {
    let documents = fetch_seed_documents(&state.http_client, &state.seed_url).await?;
    let builders = parse_seed_documents(documents)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    insert_transactions(&builders, &connection)
}

/// Fetch the dataset and insert it into the database.
pub async fn seed_database_endpoint(State(state): State<SeedState>) -> Response {
    match seed_database(&state).await {
        Ok(count) => {
            tracing::info!("Seeded {count} transactions from {}", state.seed_url);
            (StatusCode::OK, SEED_SUCCESS_MESSAGE).into_response()
        }
        Err(error) => {
            tracing::error!("Could not seed the database from {}: {error}", state.seed_url);
            (StatusCode::INTERNAL_SERVER_ERROR, SEED_FAILURE_MESSAGE).into_response()
        }
    }
}
