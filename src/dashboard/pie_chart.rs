//! Category distribution data for the pie chart.

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionFilter};

/// The number of transactions in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category label.
    #[serde(rename = "_id")]
    pub category: String,
    /// The number of transactions in the category.
    pub count: u32,
}

/// Count the transactions selected by `filter` per category.
///
/// Categories are discovered from the data and listed in the order they
/// first appear in the store.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_category_counts(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let (where_clause, params) = filter.where_clause();
    let query = format!(
        "SELECT category, COUNT(id) FROM product_transaction {where_clause} \
        GROUP BY category ORDER BY MIN(id) ASC"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .map(|count_result| count_result.map_err(Error::SqlError))
        .collect()
}
