//! Price histogram data for the bar chart.
//!
//! Prices are counted into ten fixed ranges: `0-100`, `101-200`, ...,
//! `801-900` and `901-above`. Whole-number prices follow the bounds in the
//! labels. A fractional price between two labels, e.g. 100.5, is counted in
//! the upper range so every non-negative price lands in exactly one bucket.

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionFilter};

/// The number of price ranges in the histogram.
pub const PRICE_RANGE_COUNT: usize = 10;

/// The width of each bounded price range.
const PRICE_RANGE_WIDTH: f64 = 100.0;

/// The number of transactions in one price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    /// The label of the price range, e.g. "101-200".
    pub range: String,
    /// The number of transactions with a price in the range.
    pub count: u32,
}

/// The number of transactions that share one exact price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceGroup {
    /// The price.
    #[serde(rename = "_id")]
    pub price: f64,
    /// The number of transactions with this price.
    pub count: u32,
}

/// The index of the price range `price` belongs to, or `None` for negative
/// prices.
pub fn price_range_index(price: f64) -> Option<usize> {
    if price.is_nan() || price < 0.0 {
        return None;
    }

    if price <= PRICE_RANGE_WIDTH {
        return Some(0);
    }

    let index = (price / PRICE_RANGE_WIDTH).ceil() as usize - 1;

    Some(index.min(PRICE_RANGE_COUNT - 1))
}

/// The label shown for the price range at `index`.
pub fn price_range_label(index: usize) -> String {
    match index {
        0 => "0-100".to_owned(),
        index if index >= PRICE_RANGE_COUNT - 1 => "901-above".to_owned(),
        index => format!("{}-{}", index * 100 + 1, (index + 1) * 100),
    }
}

/// Count `prices` into the fixed price ranges.
///
/// Every range is present in the result, in ascending order, even when its
/// count is zero.
pub(crate) fn count_by_price_range(prices: &[f64]) -> Vec<PriceRangeCount> {
    let mut counts = [0u32; PRICE_RANGE_COUNT];

    for index in prices.iter().copied().filter_map(price_range_index) {
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| PriceRangeCount {
            range: price_range_label(index),
            count,
        })
        .collect()
}

/// Count the transactions selected by `filter` into the fixed price ranges.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_bar_chart(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    let (where_clause, params) = filter.where_clause();
    let query = format!("SELECT price FROM product_transaction {where_clause}");

    let prices = connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), |row| row.get(0))?
        .collect::<Result<Vec<f64>, rusqlite::Error>>()?;

    Ok(count_by_price_range(&prices))
}

/// Group every transaction by its exact price, in ascending price order.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_price_groups(connection: &Connection) -> Result<Vec<PriceGroup>, Error> {
    connection
        .prepare(
            "SELECT price, COUNT(id) FROM product_transaction GROUP BY price ORDER BY price ASC",
        )?
        .query_map([], |row| {
            Ok(PriceGroup {
                price: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .map(|group_result| group_result.map_err(Error::SqlError))
        .collect()
}
