//! Balance aggregation over transaction collections.
//!
//! The global balance, per-person balances and per-project summaries all
//! accumulate through [Totals], so the rule "receipts add, expenses subtract"
//! lives in one place.
//!
//! Amounts are `f64`. Each group is summed on its own, so the per-person
//! totals add up to the global totals to within floating point rounding
//! (see [approx_eq]), not necessarily bit for bit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    threshold::{BalanceStatus, BalanceThresholds, ThresholdLookup},
    transaction::{Transaction, TransactionType},
};

// ============================================================================
// ACCUMULATION
// ============================================================================

/// A running sum using Neumaier's compensated summation.
///
/// Keeps decimal amounts such as `0.1` from drifting as they are added up, so
/// the result does not depend on the order of the transactions. NaN and
/// infinities propagate as they would with plain addition.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Sum {
    sum: f64,
    compensation: f64,
}

impl Sum {
    pub(crate) fn add(&mut self, value: f64) {
        let next = self.sum + value;

        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - next) + value;
        } else {
            self.compensation += (value - next) + self.sum;
        }

        self.sum = next;
    }

    pub(crate) fn value(&self) -> f64 {
        if self.compensation.is_finite() {
            self.sum + self.compensation
        } else {
            self.sum
        }
    }
}

/// Receipts and expenses accumulated separately.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Totals {
    receipts: Sum,
    expenses: Sum,
}

impl Totals {
    pub(crate) fn record(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionType::Receipt => self.receipts.add(transaction.amount),
            TransactionType::Expense => self.expenses.add(transaction.amount),
        }
    }

    pub(crate) fn receipts(&self) -> f64 {
        self.receipts.value()
    }

    pub(crate) fn expenses(&self) -> f64 {
        self.expenses.value()
    }

    pub(crate) fn balance(&self) -> f64 {
        self.receipts() - self.expenses()
    }
}

/// Accumulate [Totals] per distinct `key`, in the order keys are first seen.
fn totals_by<'a, I, F>(transactions: I, key: F) -> Vec<(&'a str, Totals)>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut groups: Vec<(&'a str, Totals)> = Vec::new();
    let mut index_of: HashMap<&'a str, usize> = HashMap::new();

    for transaction in transactions {
        let label = key(transaction);
        let index = *index_of.entry(label).or_insert_with(|| {
            groups.push((label, Totals::default()));
            groups.len() - 1
        });

        groups[index].1.record(transaction);
    }

    groups
}

/// Whether two totals agree to within the rounding left by adding up cent
/// amounts in different groupings.
///
/// NaN agrees with NaN, so a NaN amount does not make the totals disagree.
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }

    a == b || (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ============================================================================
// MODELS
// ============================================================================

/// The overall balance of a set of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// `receipts - expenses`.
    pub total: f64,
    /// The sum of all receipt amounts.
    pub receipts: f64,
    /// The sum of all expense amounts.
    pub expenses: f64,
}

/// One person's balance and how it compares to their thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonBalance {
    /// The person's name, exactly as it appears on their transactions.
    pub person: String,
    /// The sum of the person's receipts.
    pub receipts: f64,
    /// The sum of the person's expenses.
    pub expenses: f64,
    /// `receipts - expenses`.
    pub balance: f64,
    /// The classification of `balance` against `thresholds`.
    pub status: BalanceStatus,
    /// The thresholds that applied to this person.
    pub thresholds: BalanceThresholds,
}

/// Receipts, expenses and balance for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    /// The project name.
    pub project: String,
    /// The sum of the project's receipts.
    pub receipts: f64,
    /// The sum of the project's expenses.
    pub expenses: f64,
    /// `receipts - expenses`.
    pub balance: f64,
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Compute the total receipts, expenses and balance of `transactions`.
///
/// An empty collection has a zero balance.
pub fn compute_balance<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Balance {
    let mut totals = Totals::default();

    for transaction in transactions {
        totals.record(transaction);
    }

    Balance {
        total: totals.balance(),
        receipts: totals.receipts(),
        expenses: totals.expenses(),
    }
}

/// Compute the balance of each person in `transactions`.
///
/// People are listed in the order they first appear in `transactions`, so the
/// table stays in insertion order rather than alphabetical order.
pub fn compute_person_balances<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    thresholds: &impl ThresholdLookup,
) -> Vec<PersonBalance> {
    totals_by(transactions, |transaction| transaction.person.as_str())
        .into_iter()
        .map(|(person, totals)| {
            let balance = totals.balance();
            let thresholds = thresholds.thresholds_for(person);

            PersonBalance {
                person: person.to_owned(),
                receipts: totals.receipts(),
                expenses: totals.expenses(),
                balance,
                status: BalanceStatus::classify(balance, &thresholds),
                thresholds,
            }
        })
        .collect()
}

/// Compute receipts, expenses and balance per project, in first-seen order.
pub fn compute_project_summaries<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<ProjectSummary> {
    totals_by(transactions, |transaction| transaction.project.as_str())
        .into_iter()
        .map(|(project, totals)| ProjectSummary {
            project: project.to_owned(),
            receipts: totals.receipts(),
            expenses: totals.expenses(),
            balance: totals.balance(),
        })
        .collect()
}
