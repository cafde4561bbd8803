//! Defines the route handler for listing transactions one page at a time.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    month::{MonthFilterMode, month_range_from_query},
    pagination::{PageWindow, PaginationConfig},
};

use super::{core::Transaction, filter::TransactionFilter, query::get_transactions_page};

/// The message sent to the client when listing transactions fails.
pub const LIST_TRANSACTIONS_ERROR: &str = "Error fetching transactions";

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The default page and page size.
    pub pagination_config: PaginationConfig,
    /// How month names are turned into date ranges.
    pub month_filter_mode: MonthFilterMode,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
            month_filter_mode: state.month_filter_mode,
        }
    }
}

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The number of transactions per page, 0 for all of them.
    pub per_page: Option<u64>,
    /// Text to look for in the title or description, or a price to match.
    pub search: Option<String>,
    /// The month of sale, e.g. "March".
    pub month: Option<String>,
}

/// Get one page of the transactions sold in a month, optionally narrowed down
/// by a search term.
///
/// A query string that cannot be read, e.g. `page=abc`, is a bad request.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionsState>,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Response {
    let result = query
        .map_err(|rejection| Error::InvalidQuery(rejection.body_text()))
        .and_then(|Query(query)| list_transactions(&state, &query));

    match result {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response(LIST_TRANSACTIONS_ERROR),
    }
}

fn list_transactions(
    state: &TransactionsState,
    query: &ListTransactionsQuery,
) -> Result<Vec<Transaction>, Error> {
    let month = month_range_from_query(query.month.as_deref(), state.month_filter_mode)?;
    let filter = TransactionFilter::month(month).search(query.search.as_deref());
    let page = PageWindow::new(
        query.page.unwrap_or(state.pagination_config.default_page),
        query
            .per_page
            .unwrap_or(state.pagination_config.default_page_size),
    );

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions_page(&filter, page, &connection)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::to_bytes,
        extract::{Query, State},
        http::StatusCode,
        response::Response,
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        internal_server_error::ErrorBody,
        month::MonthFilterMode,
        pagination::PaginationConfig,
        transaction::{Transaction, create_transaction},
    };

    use super::{
        LIST_TRANSACTIONS_ERROR, ListTransactionsQuery, TransactionsState,
        list_transactions_endpoint,
    };

    fn get_test_state() -> TransactionsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        TransactionsState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
            month_filter_mode: MonthFilterMode::Calendar,
        }
    }

    async fn parse_transactions(response: Response) -> Vec<Transaction> {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn lists_first_page_by_default() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            let date = datetime!(2021-03-05 00:00 UTC);
            for i in 0..15 {
                create_transaction(&Transaction::build(&format!("item {i}"), i as f64, date), &conn)
                    .unwrap();
            }
        }

        let response = list_transactions_endpoint(
            State(state),
            Ok(Query(ListTransactionsQuery {
                month: Some("March".to_owned()),
                ..Default::default()
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let transactions = parse_transactions(response).await;
        assert_eq!(transactions.len(), 10);
        assert_eq!(transactions[0].product_title, "item 0");
    }

    #[tokio::test]
    async fn returns_requested_page() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            let date = datetime!(2021-03-05 00:00 UTC);
            for i in 0..15 {
                create_transaction(&Transaction::build(&format!("item {i}"), i as f64, date), &conn)
                    .unwrap();
            }
        }

        let response = list_transactions_endpoint(
            State(state),
            Ok(Query(ListTransactionsQuery {
                page: Some(2),
                per_page: Some(10),
                month: Some("march".to_owned()),
                search: None,
            })),
        )
        .await;

        let transactions = parse_transactions(response).await;
        assert_eq!(transactions.len(), 5);
        assert_eq!(transactions[0].product_title, "item 10");
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let state = get_test_state();

        let response = list_transactions_endpoint(
            State(state),
            Ok(Query(ListTransactionsQuery {
                month: Some("Smarch".to_owned()),
                ..Default::default()
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_failure_is_internal_server_error() {
        let conn = Connection::open_in_memory().unwrap();
        // No tables, so the query fails.
        let state = TransactionsState {
            db_connection: Arc::new(Mutex::new(conn)),
            pagination_config: PaginationConfig::default(),
            month_filter_mode: MonthFilterMode::Calendar,
        };

        let response =
            list_transactions_endpoint(State(state), Ok(Query(ListTransactionsQuery::default())))
                .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, LIST_TRANSACTIONS_ERROR);
    }
}
