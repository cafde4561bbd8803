//! Sales totals for the statistics card and the combined overview.

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionFilter};

/// Totals over the transactions selected by a month filter.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices.
    pub total_amount: f64,
    /// The number of transactions.
    pub total_items: u32,
    /// The number of transactions marked as sold.
    pub sold_items: u32,
    /// The number of transactions not marked as sold.
    pub not_sold_items: u32,
}

/// The price sum and count over every transaction.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of the prices.
    pub total_amount: f64,
    /// The number of transactions.
    pub total_items: u32,
}

/// Calculate the [Statistics] for the transactions selected by `filter`.
///
/// An empty selection yields zero for every field.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_statistics(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Statistics, Error> {
    let (where_clause, params) = filter.where_clause();
    let query = format!(
        "SELECT COALESCE(SUM(price), 0.0), COUNT(id), \
        COALESCE(SUM(sold = 1), 0), COALESCE(SUM(sold = 0), 0) \
        FROM product_transaction {where_clause}"
    );

    connection
        .prepare(&query)?
        .query_row(params_from_iter(params.iter()), |row| {
            Ok(Statistics {
                total_amount: row.get(0)?,
                total_items: row.get(1)?,
                sold_items: row.get(2)?,
                not_sold_items: row.get(3)?,
            })
        })
        .map_err(|error| error.into())
}

/// Calculate the price sum and count over every transaction.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_totals(connection: &Connection) -> Result<Totals, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(price), 0.0), COUNT(id) FROM product_transaction",
            [],
            |row| {
                Ok(Totals {
                    total_amount: row.get(0)?,
                    total_items: row.get(1)?,
                })
            },
        )
        .map_err(|error| error.into())
}
