//! The unfiltered overview returned by the combined route.
//!
//! Unlike the other dashboard queries this ignores the month filter, and its
//! bar chart groups by exact price instead of the fixed price ranges.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{Transaction, TransactionFilter, get_all_transactions},
};

use super::{
    bar_chart::{PriceGroup, get_price_groups},
    pie_chart::{CategoryCount, get_category_counts},
    statistics::{Totals, get_totals},
};

/// Every transaction together with totals and groupings over all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// Every transaction in insertion order.
    pub transactions: Vec<Transaction>,
    /// The price sum and count over every transaction.
    pub statistics: Totals,
    /// The number of transactions per exact price.
    pub bar_chart: Vec<PriceGroup>,
    /// The number of transactions per category.
    pub pie_chart: Vec<CategoryCount>,
}

/// Gather the [CombinedData] over every transaction.
///
/// # Errors
/// Returns [Error::SqlError] if any of the queries fail.
pub(crate) fn get_combined_data(connection: &Connection) -> Result<CombinedData, Error> {
    Ok(CombinedData {
        transactions: get_all_transactions(connection)?,
        statistics: get_totals(connection)?,
        bar_chart: get_price_groups(connection)?,
        pie_chart: get_category_counts(&TransactionFilter::default(), connection)?,
    })
}
