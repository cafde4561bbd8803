//! Dashboard HTTP handlers.
//!
//! Each handler runs its own queries against the store; the month filter is
//! re-applied per request and nothing is cached between routes.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    month::{MonthFilterMode, month_range_from_query},
    transaction::TransactionFilter,
};

use super::{
    bar_chart::get_bar_chart, combined::get_combined_data, pie_chart::get_category_counts,
    statistics::get_statistics,
};

const STATISTICS_ERROR: &str = "Error fetching statistics";
const BAR_CHART_ERROR: &str = "Error fetching bar chart data";
const PIE_CHART_ERROR: &str = "Error fetching pie chart data";
const COMBINED_ERROR: &str = "Error fetching combined data";

/// The state needed for the dashboard routes.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// How month names are turned into date ranges.
    pub month_filter_mode: MonthFilterMode,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            month_filter_mode: state.month_filter_mode,
        }
    }
}

/// The month query parameter shared by the dashboard routes.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MonthQuery {
    /// The month of sale, e.g. "March". No month means every month.
    pub month: Option<String>,
}

impl DashboardState {
    fn month_filter(
        &self,
        query: Result<Query<MonthQuery>, QueryRejection>,
    ) -> Result<TransactionFilter, Error> {
        let Query(query) = query.map_err(|rejection| Error::InvalidQuery(rejection.body_text()))?;
        let month = month_range_from_query(query.month.as_deref(), self.month_filter_mode)?;

        Ok(TransactionFilter::month(month))
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

fn into_json_response<T: Serialize>(result: Result<T, Error>, failure_message: &str) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(error) => error.into_json_response(failure_message),
    }
}

/// Get the price total and sold/unsold counts for a month.
pub async fn get_statistics_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Response {
    let result = state
        .month_filter(query)
        .and_then(|filter| get_statistics(&filter, &*state.connection()?));

    into_json_response(result, STATISTICS_ERROR)
}

/// Get the number of transactions per price range for a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Response {
    let result = state
        .month_filter(query)
        .and_then(|filter| get_bar_chart(&filter, &*state.connection()?));

    into_json_response(result, BAR_CHART_ERROR)
}

/// Get the number of transactions per category for a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Response {
    let result = state
        .month_filter(query)
        .and_then(|filter| get_category_counts(&filter, &*state.connection()?));

    into_json_response(result, PIE_CHART_ERROR)
}

/// Get every transaction with totals and groupings, ignoring months.
pub async fn get_combined_endpoint(State(state): State<DashboardState>) -> Response {
    let result = state
        .connection()
        .and_then(|connection| get_combined_data(&connection));

    into_json_response(result, COMBINED_ERROR)
}
