use std::error::Error;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, OffsetDateTime};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use petty_cash::{
    Dashboard, DashboardFilter, Ledger, Selection, SqliteStore, format_currency,
    transaction::parse_date,
};

/// Print the petty cash balances and dashboard reports for a date range.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The first day to report on, e.g. 2025-01-01. Defaults to one month
    /// before the end date.
    #[arg(long, value_parser = parse_date_arg)]
    start_date: Option<Date>,

    /// The last day to report on. Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    end_date: Option<Date>,

    /// Only report on this person.
    #[arg(long)]
    person: Option<String>,

    /// Only report on this project.
    #[arg(long)]
    project: Option<String>,

    /// Print the dashboard as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let conn = Connection::open(&args.db_path)?;
    let ledger = Ledger::open(SqliteStore::new(conn)?);

    let end_date = args.end_date.unwrap_or_else(today);
    let default_window = DashboardFilter::last_month(end_date);
    let filter = DashboardFilter {
        start_date: args.start_date.unwrap_or(default_window.start_date),
        end_date,
        person: Selection::from(args.person),
        project: Selection::from(args.project),
    };

    if filter.start_date > filter.end_date {
        tracing::warn!(
            "Start date {} is after end date {}, nothing will match",
            filter.start_date,
            filter.end_date
        );
    }

    let dashboard = Dashboard::build(ledger.transactions(), &filter, ledger.person_thresholds());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    let balance = ledger.balance();
    println!("Balance: {}", format_currency(balance.total));
    println!("  Receipts: {}", format_currency(balance.receipts));
    println!("  Expenses: {}", format_currency(balance.expenses));

    println!();
    println!(
        "Report for {} to {} ({} transactions)",
        filter.start_date,
        filter.end_date,
        dashboard.transactions.len()
    );

    println!();
    println!("People:");
    for person in &dashboard.person_balances {
        println!(
            "  {}: {} ({:?}, receipts {}, expenses {})",
            person.person,
            format_currency(person.balance),
            person.status,
            format_currency(person.receipts),
            format_currency(person.expenses)
        );
    }

    println!();
    println!(
        "Expenses by category (total {}):",
        format_currency(dashboard.expenses_by_category.total)
    );
    for (category, share) in dashboard.expenses_by_category.shares() {
        println!(
            "  {}: {} in {} transactions ({:.1}%)",
            category.category,
            format_currency(category.total),
            category.count,
            share * 100.0
        );
    }

    println!();
    println!("Receipts by category:");
    for series in &dashboard.receipts_by_date_and_category {
        let total: f64 = series.points.values().sum();
        println!(
            "  {}: {} over {} days",
            series.category,
            format_currency(total),
            series.points.len()
        );
    }

    println!();
    println!("Daily expenses:");
    for day in &dashboard.daily_expenses {
        println!("  {}: {}", day.date, format_currency(day.total));
        for group in &day.groups {
            println!(
                "    {}: {} ({} transactions)",
                group.project,
                format_currency(group.total),
                group.transactions.len()
            );
        }
    }

    Ok(())
}

/// Today in the local timezone, or in UTC if the local offset is unknown.
fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn parse_date_arg(text: &str) -> Result<Date, String> {
    parse_date(text).map_err(|error| format!("expected a date like 2025-01-31: {error}"))
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(stdout_log)
        .init();
}
