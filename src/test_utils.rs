//! Fixtures shared by the unit tests.

use time::{Date, macros::date};

use crate::transaction::{Transaction, TransactionId, TransactionType};

/// A transaction with placeholder labels and a fresh ID.
///
/// Override fields with struct update syntax, e.g.
/// `Transaction { person: "Bob".to_owned(), ..receipt(10.0) }`.
pub(crate) fn transaction(kind: TransactionType, amount: f64) -> Transaction {
    Transaction::build(kind, amount, date!(2025 - 01 - 01), "test")
        .category("Miscellaneous")
        .person("Alice")
        .project("Default Project")
        .finalize(TransactionId::generate())
}

pub(crate) fn receipt(amount: f64) -> Transaction {
    transaction(TransactionType::Receipt, amount)
}

pub(crate) fn expense(amount: f64) -> Transaction {
    transaction(TransactionType::Expense, amount)
}

/// Set the person of a transaction.
pub(crate) fn by(person: &str, transaction: Transaction) -> Transaction {
    Transaction {
        person: person.to_owned(),
        ..transaction
    }
}

/// Set the date of a transaction.
pub(crate) fn on(date: Date, transaction: Transaction) -> Transaction {
    Transaction { date, ..transaction }
}
