//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, db::initialize, month::MonthFilterMode, pagination::PaginationConfig,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The config that controls the default page of transactions.
    pub pagination_config: PaginationConfig,

    /// How month names in queries are turned into date ranges.
    pub month_filter_mode: MonthFilterMode,

    /// The URL of the JSON dataset used to seed the database.
    pub seed_url: String,

    /// The client used to download the seed dataset.
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_url: &str,
        month_filter_mode: MonthFilterMode,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            db_connection: connection,
            pagination_config,
            month_filter_mode,
            seed_url: seed_url.to_owned(),
            http_client: reqwest::Client::new(),
        })
    }
}
