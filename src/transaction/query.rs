//! Database query helpers for listing transactions.

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{Error, pagination::PageWindow};

use super::{
    core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row},
    filter::TransactionFilter,
};

/// Get one page of the transactions selected by `filter`, in insertion order.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub(crate) fn get_transactions_page(
    filter: &TransactionFilter,
    page: PageWindow,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, mut params) = filter.where_clause();
    let (limit, offset) = page.sql_limit_offset();
    params.push(Value::Integer(limit));
    params.push(Value::Integer(offset));

    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM product_transaction {where_clause} \
        ORDER BY id ASC LIMIT ? OFFSET ?"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Get every transaction in insertion order.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(crate) fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    get_transactions_page(&TransactionFilter::default(), PageWindow::ALL, connection)
}
