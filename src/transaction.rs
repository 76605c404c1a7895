//! Defines the core data model for transactions.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use uuid::Uuid;

/// The format transaction dates are stored and entered in, e.g. `2025-01-15`.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date string.
///
/// # Errors
/// Returns the underlying parse error if `text` is not a valid calendar date
/// in [DATE_FORMAT].
pub fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, DATE_FORMAT)
}

/// JSON has no NaN, so serde_json writes a NaN amount as `null`. Read it back
/// as NaN.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

// ============================================================================
// MODELS
// ============================================================================

/// An opaque, unique identifier for a transaction.
///
/// New IDs are random v4 UUIDs, but any string loaded from storage is
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh ID that has not been used before.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing ID, e.g. one chosen by the user from a list.
    pub fn new_unchecked(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether money came in or went out.
///
/// This is the only polarity signal: amounts are always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received, increases the balance.
    Receipt,
    /// Money spent, decreases the balance.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in storage and for sorting.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Receipt => "receipt",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A receipt or an expense, i.e. an event where money was either received or
/// spent.
///
/// The labels (`category`, `person`, `project`) are free text. They are usually
/// picked from the managed lists in [crate::labels], but a transaction keeps its
/// label even after the label is removed from its list.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money received or spent. Never negative when entered
    /// through [crate::validation].
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// Whether the amount was received or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The category of the transaction, e.g. "Travel", "Salary".
    pub category: String,
    /// The person who received or spent the money.
    pub person: String,
    /// The project the transaction is billed to.
    pub project: String,
    /// An encoded image of the bill. Not interpreted by this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_image: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        kind: TransactionType,
        amount: f64,
        date: Date,
        description: &str,
    ) -> NewTransaction {
        NewTransaction {
            kind,
            amount,
            date,
            description: description.to_owned(),
            category: String::new(),
            person: String::new(),
            project: String::new(),
            bill_image: None,
        }
    }

    /// Merge `update` into this transaction.
    ///
    /// Only the fields set in `update` change; the ID never does.
    pub fn apply(&mut self, update: TransactionUpdate) {
        let TransactionUpdate {
            date,
            description,
            amount,
            kind,
            category,
            person,
            project,
            bill_image,
        } = update;

        if let Some(date) = date {
            self.date = date;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(person) = person {
            self.person = person;
        }
        if let Some(project) = project {
            self.project = project;
        }
        if let Some(bill_image) = bill_image {
            self.bill_image = bill_image;
        }
    }
}

/// A transaction that has not been given an ID yet.
///
/// Build one with [Transaction::build] and the setters below, then hand it to
/// [crate::Ledger::add_transaction] which assigns the ID.
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    /// Whether the amount was received or spent.
    pub kind: TransactionType,
    /// The non-negative amount of money.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The category label.
    pub category: String,
    /// The person label.
    pub person: String,
    /// The project label.
    pub project: String,
    /// An encoded image of the bill, if one was attached.
    pub bill_image: Option<String>,
}

impl NewTransaction {
    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the person for the transaction.
    pub fn person(mut self, person: &str) -> Self {
        self.person = person.to_owned();
        self
    }

    /// Set the project for the transaction.
    pub fn project(mut self, project: &str) -> Self {
        self.project = project.to_owned();
        self
    }

    /// Attach a bill image to the transaction.
    pub fn bill_image(mut self, bill_image: Option<String>) -> Self {
        self.bill_image = bill_image;
        self
    }

    /// Turn the builder into a [Transaction] with the given ID.
    pub fn finalize(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            person: self.person,
            project: self.project,
            bill_image: self.bill_image,
        }
    }
}

/// A partial update to a transaction. `None` leaves a field unchanged.
///
/// `bill_image` is doubly optional so that an image can be removed:
/// `Some(None)` clears it.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct TransactionUpdate {
    /// The new date.
    pub date: Option<Date>,
    /// The new description.
    pub description: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new transaction type.
    pub kind: Option<TransactionType>,
    /// The new category.
    pub category: Option<String>,
    /// The new person.
    pub person: Option<String>,
    /// The new project.
    pub project: Option<String>,
    /// The new bill image, or `Some(None)` to remove it.
    pub bill_image: Option<Option<String>>,
}

// ============================================================================
// TESTS
// ============================================================================
