//! Petty Cash is a ledger for a person's or a team's petty cash.
//!
//! Users record receipts (money in) and expenses (money out), tag them with a
//! person, project and category, and view balances and dashboards built from
//! the recorded transactions.
//!
//! The aggregation functions in [balance], [filter], [report] and
//! [dashboard] are pure: they take the current transactions (plus any
//! filter, sort or threshold settings) and return a freshly computed view.
//! The [Ledger] owns the authoritative collection and persists it through a
//! [KeyValueStore] after every change.

#![warn(missing_docs)]

pub mod balance;
pub mod dashboard;
pub mod filter;
pub mod labels;
pub mod ledger;
pub mod money;
pub mod report;
pub mod store;
pub mod threshold;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use balance::{
    Balance, PersonBalance, ProjectSummary, compute_balance, compute_person_balances,
    compute_project_summaries,
};
pub use dashboard::{Dashboard, DashboardFilter};
pub use filter::{
    FilterOptions, Selection, SortConfig, SortDirection, SortField, TransactionFilter,
    filter_and_sort,
};
pub use labels::LabelList;
pub use ledger::Ledger;
pub use money::format_currency;
pub use report::{
    CategoryReport, CategoryTotal, DailyExpenses, ProjectGroup, ReceiptSeries,
    aggregate_by_category, aggregate_receipts_by_date_and_category,
    group_expenses_by_project_for_date, unique_dates,
};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use threshold::{BalanceStatus, BalanceThresholds, PersonThresholds, ThresholdLookup};
pub use transaction::{
    NewTransaction, Transaction, TransactionId, TransactionType, TransactionUpdate,
};
pub use validation::{FormField, TransactionForm, ValidationErrors};

/// The errors that may occur in the application.
///
/// None of the aggregation functions return errors. These come from the
/// entry boundary (validation), the ledger lifecycle and the storage layer.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of a transaction form failed validation.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(ValidationErrors),

    /// The low threshold was negative or greater than the medium threshold.
    #[error("invalid balance thresholds: low {low} must be between 0 and medium {medium}")]
    InvalidThresholds {
        /// The rejected low threshold.
        low: f64,
        /// The rejected medium threshold.
        medium: f64,
    },

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the ledger")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the ledger")]
    UpdateMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a value as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}
