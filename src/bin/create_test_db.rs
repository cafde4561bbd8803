use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use transaction_dashboard::{initialize_db, insert_transactions, parse_seed_documents};

/// A utility for creating a test database for the transaction dashboard API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// File path to a local copy of the JSON dataset to load.
    #[arg(long, short)]
    json_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Reading dataset from {:#?}", args.json_path);
    let json = fs::read_to_string(&args.json_path)?;
    let documents: Vec<serde_json::Value> = serde_json::from_str(&json)?;
    let transactions = parse_seed_documents(documents)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Inserting {} transactions...", transactions.len());
    let inserted = insert_transactions(&transactions, &conn)?;

    println!("Success! Inserted {inserted} transactions.");

    Ok(())
}
