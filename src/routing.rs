//! Application router configuration.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    dashboard::{
        get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    seed::seed_database_endpoint,
    transaction::list_transactions_endpoint,
};

/// Return a router with all the app's routes.
///
/// The dashboard client is served from a different origin, so any origin may
/// call the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SEED, get(seed_database_endpoint))
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED, get(get_combined_endpoint))
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
