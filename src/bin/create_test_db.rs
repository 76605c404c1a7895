use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use petty_cash::{
    LabelList, Ledger, SqliteStore, Transaction,
    TransactionType::{Expense, Receipt},
};

/// A utility for creating a test database for the petty cash report.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
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

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let mut ledger = Ledger::open(SqliteStore::new(conn)?);

    println!("Creating labels...");
    for person in ["Alice", "Bob"] {
        ledger.add_label(LabelList::People, person);
    }
    ledger.add_label(LabelList::Projects, "Office Move");

    println!("Creating transactions...");
    let today = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date();
    let days_ago = |days: i64| today - Duration::days(days);

    let transactions = [
        (Receipt, 2000.0, 28, "Float top-up", "Reimbursement", "Alice", "Default Project"),
        (Receipt, 800.0, 27, "Float top-up", "Reimbursement", "Bob", "Default Project"),
        (Expense, 45.5, 20, "Printer paper", "Office Supplies", "Alice", "Default Project"),
        (Expense, 120.0, 14, "Taxi to client", "Travel", "Bob", "Office Move"),
        (Expense, 32.8, 14, "Team lunch", "Meals", "Bob", "Office Move"),
        (Expense, 310.0, 7, "Packing boxes", "Miscellaneous", "Alice", "Office Move"),
        (Receipt, 150.0, 3, "Refund for returned chair", "Other Income", "Alice", "Office Move"),
        (Expense, 64.2, 1, "Electricity top-up", "Utilities", "Bob", "Default Project"),
    ];

    for (kind, amount, age, description, category, person, project) in transactions {
        ledger.add_transaction(
            Transaction::build(kind, amount, days_ago(age), description)
                .category(category)
                .person(person)
                .project(project),
        );
    }

    println!("Success!");

    Ok(())
}
