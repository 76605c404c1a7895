//! Validation of transactions entered by a user.
//!
//! This is the only place amounts and required labels are checked. Once a
//! [NewTransaction] exists, the rest of the crate takes it as given.

use std::{collections::BTreeMap, fmt::Display};

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionType, parse_date},
};

/// A transaction as typed into the entry form, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    /// The date in `YYYY-MM-DD` format.
    pub date: String,
    /// What the transaction was for.
    pub description: String,
    /// The amount as entered, e.g. `"12.50"`.
    pub amount: String,
    /// Receipt or expense.
    pub kind: TransactionType,
    /// The category label.
    pub category: String,
    /// The person label.
    pub person: String,
    /// The project label. May be empty.
    pub project: String,
    /// An encoded image of the bill, if one was attached.
    pub bill_image: Option<String>,
}

/// A field of the [TransactionForm] that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    /// The date field.
    Date,
    /// The description field.
    Description,
    /// The amount field.
    Amount,
    /// The person field.
    Person,
    /// The category field.
    Category,
}

/// The validation message for each field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, &'static str>);

impl ValidationErrors {
    /// The message for `field`, if it failed.
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// The failed fields and their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    /// The number of failed fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether every field passed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, field: FormField, message: &'static str) {
        self.0.insert(field, message);
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.values().copied().collect();
        write!(f, "{}", messages.join(", "))
    }
}

impl TransactionForm {
    /// Check every field and build the transaction.
    ///
    /// Text fields are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidTransaction] listing every field that failed:
    /// a missing or malformed date, a blank description, person or category,
    /// or an amount that is not a number greater than zero.
    pub fn validate(&self) -> Result<NewTransaction, Error> {
        let mut errors = ValidationErrors::default();

        let date = match self.date.trim() {
            "" => {
                errors.insert(FormField::Date, "Date is required");
                None
            }
            text => match parse_date(text) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert(FormField::Date, "Date must be in YYYY-MM-DD format");
                    None
                }
            },
        };

        let amount = match self.amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount > 0.0 => Some(amount),
            _ => {
                errors.insert(FormField::Amount, "Amount must be greater than 0");
                None
            }
        };

        if self.description.trim().is_empty() {
            errors.insert(FormField::Description, "Description is required");
        }

        if self.person.trim().is_empty() {
            errors.insert(FormField::Person, "Person is required");
        }

        if self.category.trim().is_empty() {
            errors.insert(FormField::Category, "Category is required");
        }

        match (date, amount) {
            (Some(date), Some(amount)) if errors.is_empty() => {
                Ok(
                    Transaction::build(self.kind, amount, date, self.description.trim())
                        .category(self.category.trim())
                        .person(self.person.trim())
                        .project(self.project.trim())
                        .bill_image(self.bill_image.clone()),
                )
            }
            _ => Err(Error::InvalidTransaction(errors)),
        }
    }
}
