//! The managed lists of people, projects and categories offered when
//! entering a transaction.
//!
//! Each list starts from a seed until it is first changed. Transactions keep
//! their labels as plain strings, so removing a label here does not touch any
//! transaction.

use crate::{
    store::{
        EXPENSE_CATEGORIES_KEY, KeyValueStore, PEOPLE_KEY, PROJECTS_KEY, RECEIPT_CATEGORIES_KEY,
        load_or_default, save,
    },
    transaction::TransactionType,
};

const RECEIPT_CATEGORY_SEED: [&str; 4] = ["Salary", "Bonus", "Reimbursement", "Other Income"];

const EXPENSE_CATEGORY_SEED: [&str; 5] = [
    "Office Supplies",
    "Travel",
    "Meals",
    "Utilities",
    "Miscellaneous",
];

const PROJECT_SEED: [&str; 1] = ["Default Project"];

/// One of the managed label lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelList {
    /// The people who hold or spend petty cash.
    People,
    /// The projects transactions are billed to.
    Projects,
    /// The categories for receipts or for expenses.
    Categories(TransactionType),
}

impl LabelList {
    /// The storage key the list is saved under.
    pub fn key(&self) -> &'static str {
        match self {
            LabelList::People => PEOPLE_KEY,
            LabelList::Projects => PROJECTS_KEY,
            LabelList::Categories(TransactionType::Receipt) => RECEIPT_CATEGORIES_KEY,
            LabelList::Categories(TransactionType::Expense) => EXPENSE_CATEGORIES_KEY,
        }
    }

    /// The labels the list holds before it is first changed.
    pub fn seed(&self) -> Vec<String> {
        let seed: &[&str] = match self {
            LabelList::People => &[],
            LabelList::Projects => &PROJECT_SEED,
            LabelList::Categories(TransactionType::Receipt) => &RECEIPT_CATEGORY_SEED,
            LabelList::Categories(TransactionType::Expense) => &EXPENSE_CATEGORY_SEED,
        };

        seed.iter().map(|label| label.to_string()).collect()
    }
}

/// Get the labels in `list`, or its seed if it has never been saved.
pub fn get_labels(list: LabelList, store: &impl KeyValueStore) -> Vec<String> {
    load_or_default(store, list.key(), list.seed())
}

/// Append `label` to `list` unless it is already there.
///
/// Returns the updated list. Nothing is written if `label` already exists.
pub fn add_label(list: LabelList, label: &str, store: &mut impl KeyValueStore) -> Vec<String> {
    let mut labels = get_labels(list, &*store);

    if labels.iter().any(|existing| existing == label) {
        return labels;
    }

    labels.push(label.to_owned());
    save(store, list.key(), &labels);
    labels
}

/// Remove every occurrence of `label` from `list` and return the updated list.
pub fn delete_label(list: LabelList, label: &str, store: &mut impl KeyValueStore) -> Vec<String> {
    let mut labels = get_labels(list, &*store);

    labels.retain(|existing| existing != label);
    save(store, list.key(), &labels);
    labels
}

/// Replace every occurrence of `old_label` in `list` with `new_label`.
///
/// Transactions that use `old_label` are not changed.
pub fn rename_label(
    list: LabelList,
    old_label: &str,
    new_label: &str,
    store: &mut impl KeyValueStore,
) -> Vec<String> {
    let labels: Vec<String> = get_labels(list, &*store)
        .into_iter()
        .map(|existing| {
            if existing == old_label {
                new_label.to_owned()
            } else {
                existing
            }
        })
        .collect();

    save(store, list.key(), &labels);
    labels
}
