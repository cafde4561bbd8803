//! Dashboard module
//!
//! Provides the summary statistics, price histogram and category
//! distribution shown next to the transactions table, plus the unfiltered
//! combined overview.

mod bar_chart;
mod combined;
mod handlers;
mod pie_chart;
mod statistics;

pub use handlers::{
    get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
    get_statistics_endpoint,
};
