//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// A product sale or offer, as stored in the database.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    pub id: TransactionId,
    /// The name of the product.
    pub product_title: String,
    /// A text description of the product.
    pub description: String,
    /// The price of the product.
    pub price: f64,
    /// When the product was sold, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// A short label for the kind of product, e.g. "electronics".
    pub category: String,
    /// Whether the product has been sold.
    pub sold: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        product_title: &str,
        price: f64,
        date_of_sale: OffsetDateTime,
    ) -> TransactionBuilder {
        TransactionBuilder {
            product_title: product_title.to_owned(),
            description: String::new(),
            price,
            date_of_sale,
            category: String::new(),
            sold: false,
        }
    }
}

/// A transaction that has not been inserted into the database yet.
///
/// This is also the shape of a record in the seed dataset, which names the
/// product title `title`. Unknown fields, such as the dataset's own `id` and
/// `image`, are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBuilder {
    /// The name of the product.
    #[serde(alias = "title")]
    pub product_title: String,
    /// A text description of the product.
    pub description: String,
    /// The price of the product. Must be a finite number.
    pub price: f64,
    /// When the product was sold.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// A short label for the kind of product.
    pub category: String,
    /// Whether the product has been sold.
    pub sold: bool,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product was sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Convert a JSON document into a transaction builder.
    ///
    /// # Errors
    /// Returns [Error::InvalidRecord] if a required field is missing or has
    /// the wrong type, or if the price is not finite.
    pub fn from_document(document: serde_json::Value) -> Result<Self, Error> {
        let builder: Self = serde_json::from_value(document)
            .map_err(|error| Error::InvalidRecord(error.to_string()))?;

        builder.validate()?;

        Ok(builder)
    }

    fn validate(&self) -> Result<(), Error> {
        if !self.price.is_finite() {
            return Err(Error::InvalidRecord(format!(
                "price {} is not a finite number",
                self.price
            )));
        }

        Ok(())
    }

    /// The sale date as stored in the database: RFC 3339 in UTC.
    fn date_of_sale_text(&self) -> Result<String, Error> {
        self.date_of_sale
            .to_offset(UtcOffset::UTC)
            .format(&Rfc3339)
            .map_err(|error| {
                Error::InvalidRecord(format!(
                    "could not format date of sale {}: {error}",
                    self.date_of_sale
                ))
            })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns of a transaction row in the order [map_transaction_row] expects.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, product_title, description, price, date_of_sale, category, sold";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidRecord] if the price is not finite or the date cannot be stored,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: &TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;
    let date_of_sale = builder.date_of_sale_text()?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO product_transaction (product_title, description, price, date_of_sale, category, sold)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                &builder.product_title,
                &builder.description,
                builder.price,
                date_of_sale,
                &builder.category,
                builder.sold,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Insert every builder as a new transaction, all or nothing.
///
/// The rows are inserted inside a single SQL transaction, so if any insert
/// fails none of the rows are kept.
///
/// # Errors
/// Returns the error of the first insert that failed, see [create_transaction].
pub fn insert_transactions(
    builders: &[TransactionBuilder],
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    for builder in builders {
        create_transaction(builder, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(builders.len())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM product_transaction;", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                date_of_sale TEXT NOT NULL,
                category TEXT NOT NULL,
                sold INTEGER NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns listed in [TRANSACTION_COLUMNS], in order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let product_title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let date_text: String = row.get(4)?;
    let date_of_sale = OffsetDateTime::parse(&date_text, &Rfc3339).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error))
    })?;
    let category = row.get(5)?;
    let sold = row.get(6)?;

    Ok(Transaction {
        id,
        product_title,
        description,
        price,
        date_of_sale,
        category,
        sold,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        transaction::{Transaction, TransactionBuilder, count_transactions, create_transaction},
    };

    use super::insert_transactions;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let price = 12.3;

        let result = create_transaction(
            &Transaction::build("Mug", price, datetime!(2021-11-27 20:29:54 UTC))
                .description("A mug")
                .category("kitchen")
                .sold(true),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.id, 1);
                assert_eq!(transaction.price, price);
                assert_eq!(transaction.product_title, "Mug");
                assert_eq!(transaction.description, "A mug");
                assert_eq!(transaction.category, "kitchen");
                assert!(transaction.sold);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_stores_date_in_utc() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            &Transaction::build("Lamp", 1.0, datetime!(2021-03-01 02:00:00 +05:30)),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.date_of_sale, datetime!(2021-02-28 20:30:00 UTC));
        assert_eq!(transaction.date_of_sale.offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn create_fails_on_non_finite_price() {
        let conn = get_test_connection();

        let result = create_transaction(
            &Transaction::build("Lamp", f64::INFINITY, datetime!(2021-03-01 00:00 UTC)),
            &conn,
        );

        assert!(matches!(result, Err(Error::InvalidRecord(_))));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn insert_many_is_all_or_nothing() {
        let conn = get_test_connection();
        let date = datetime!(2021-03-01 00:00 UTC);
        let builders = [
            Transaction::build("A", 1.0, date),
            Transaction::build("B", f64::NAN, date),
        ];

        let result = insert_transactions(&builders, &conn);

        assert!(result.is_err());
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn insert_many_appends() {
        let conn = get_test_connection();
        let date = datetime!(2021-03-01 00:00 UTC);
        let builders = [
            Transaction::build("A", 1.0, date),
            Transaction::build("B", 2.0, date),
        ];

        insert_transactions(&builders, &conn).unwrap();
        insert_transactions(&builders, &conn).unwrap();

        assert_eq!(count_transactions(&conn), Ok(4));
    }

    #[test]
    fn builder_from_seed_document() {
        let document = json!({
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://example.com/image.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        });

        let builder = TransactionBuilder::from_document(document).unwrap();

        assert_eq!(builder.product_title, "Fjallraven Backpack");
        assert_eq!(builder.price, 329.85);
        assert_eq!(builder.category, "men's clothing");
        assert!(!builder.sold);
        assert_eq!(builder.date_of_sale, datetime!(2021-11-27 20:29:54 +05:30));
    }

    #[test]
    fn builder_accepts_product_title_field() {
        let document = json!({
            "productTitle": "Mug",
            "price": 5,
            "description": "",
            "category": "kitchen",
            "sold": true,
            "dateOfSale": "2022-01-01T00:00:00Z"
        });

        let builder = TransactionBuilder::from_document(document).unwrap();

        assert_eq!(builder.product_title, "Mug");
        assert_eq!(builder.price, 5.0);
    }

    #[test]
    fn builder_rejects_missing_fields() {
        let document = json!({
            "title": "Mug",
            "description": "",
            "category": "kitchen",
            "sold": true,
            "dateOfSale": "2022-01-01T00:00:00Z"
        });

        let result = TransactionBuilder::from_document(document);

        match result {
            Err(Error::InvalidRecord(message)) => assert!(message.contains("price")),
            other => panic!("expected an invalid record error, got {other:?}"),
        }
    }

    #[test]
    fn builder_rejects_bad_dates() {
        let document = json!({
            "title": "Mug",
            "price": 5,
            "description": "",
            "category": "kitchen",
            "sold": true,
            "dateOfSale": "yesterday"
        });

        assert!(matches!(
            TransactionBuilder::from_document(document),
            Err(Error::InvalidRecord(_))
        ));
    }

    #[test]
    fn transaction_serializes_with_camel_case_fields() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            &Transaction::build("Mug", 5.0, datetime!(2022-01-01 00:00 UTC)).category("kitchen"),
            &conn,
        )
        .unwrap();

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["productTitle"], "Mug");
        assert_eq!(json["dateOfSale"], "2022-01-01T00:00:00Z");
        assert_eq!(json["sold"], false);
        assert_eq!(json["id"], 1);
    }
}
