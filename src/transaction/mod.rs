//! Transaction records and the queries for listing them.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The month and search filter shared by every query
//! - The route handler for listing transactions page by page

mod core;
mod filter;
mod list_endpoint;
mod query;

pub use core::{Transaction, TransactionBuilder, create_transaction_table, insert_transactions};
pub use filter::TransactionFilter;
pub use list_endpoint::list_transactions_endpoint;
pub(crate) use query::get_all_transactions;

#[cfg(test)]
pub use core::{count_transactions, create_transaction};
