//! Filtering and sorting of the transaction list.

use std::{cmp::Ordering, collections::HashSet};

use feruca::Collator;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::transaction::{Transaction, TransactionType};

// ============================================================================
// FILTERS
// ============================================================================

/// Either every value of a label, or exactly one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// No constraint.
    #[default]
    All,
    /// Only transactions whose label equals this string exactly.
    Only(String),
}

impl Selection {
    /// Whether `value` is selected.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl From<Option<String>> for Selection {
    fn from(value: Option<String>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }
}

/// The constraints applied to the transaction list.
///
/// Every dimension is combined with AND. The default value has no constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Case-insensitive text that must appear in the description, category,
    /// person or project. Empty matches everything.
    pub search: String,
    /// Only receipts or only expenses. `None` matches both.
    pub kind: Option<TransactionType>,
    /// The person to show.
    pub person: Selection,
    /// The project to show.
    pub project: Selection,
    /// The category to show.
    pub category: Selection,
    /// The earliest date to show, inclusive.
    pub start_date: Option<Date>,
    /// The latest date to show, inclusive.
    pub end_date: Option<Date>,
}

impl TransactionFilter {
    /// Whether `transaction` passes every constraint.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.matches_search(transaction)
            && self.kind.is_none_or(|kind| transaction.kind == kind)
            && self.person.matches(&transaction.person)
            && self.project.matches(&transaction.project)
            && self.category.matches(&transaction.category)
            && self.start_date.is_none_or(|start| transaction.date >= start)
            && self.end_date.is_none_or(|end| transaction.date <= end)
    }

    fn matches_search(&self, transaction: &Transaction) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        [
            &transaction.description,
            &transaction.category,
            &transaction.person,
            &transaction.project,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

// ============================================================================
// SORTING
// ============================================================================

/// The column the transaction list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Transaction date.
    Date,
    /// Transaction amount, compared numerically.
    Amount,
    /// Description text.
    Description,
    /// Person label.
    Person,
    /// Project label.
    Project,
    /// Category label.
    Category,
    /// Receipt or expense.
    Type,
}

/// Ascending or descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// How to order the transaction list. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    /// The column to sort by.
    pub field: SortField,
    /// The sort direction.
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    /// The sort order after the user clicks the `field` column header.
    ///
    /// Clicking the current column while ascending switches to descending,
    /// anything else sorts ascending by `field`.
    pub fn toggle(self, field: SortField) -> Self {
        let direction = if self.field == field && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };

        Self { field, direction }
    }

    fn compare(&self, collator: &mut Collator, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = match self.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.total_cmp(&b.amount),
            SortField::Description => compare_text(collator, &a.description, &b.description),
            SortField::Person => compare_text(collator, &a.person, &b.person),
            SortField::Project => compare_text(collator, &a.project, &b.project),
            SortField::Category => compare_text(collator, &a.category, &b.category),
            SortField::Type => a.kind.as_str().cmp(b.kind.as_str()),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Compare text with the Unicode collation algorithm (CLDR root order), so
/// accented letters sort next to their base letter and case is secondary to
/// the letters themselves. Strings the collator considers equal are ordered
/// lowercase first.
fn compare_text(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| b.cmp(a))
}

/// Filter `transactions` and sort what remains.
///
/// The sort is stable, so transactions with equal keys stay in their original
/// relative order in both directions.
pub fn filter_and_sort<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
    sort: SortConfig,
) -> Vec<&'a Transaction> {
    let mut filtered: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect();

    let mut collator = Collator::default();
    filtered.sort_by(|a, b| sort.compare(&mut collator, a, b));

    filtered
}

// ============================================================================
// FILTER OPTIONS
// ============================================================================

/// The distinct labels present in a set of transactions, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct person labels.
    pub people: Vec<String>,
    /// Distinct project labels.
    pub projects: Vec<String>,
    /// Distinct category labels.
    pub categories: Vec<String>,
}

impl FilterOptions {
    /// Collect the labels that can be filtered on.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            people: distinct(transactions.iter().map(|t| t.person.as_str())),
            projects: distinct(transactions.iter().map(|t| t.project.as_str())),
            categories: distinct(transactions.iter().map(|t| t.category.as_str())),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();

    values
        .filter(|value| seen.insert(*value))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use feruca::Collator;
    use time::macros::date;

    use crate::{
        filter::{
            FilterOptions, Selection, SortConfig, SortDirection, SortField, TransactionFilter,
            compare_text, filter_and_sort,
        },
        test_utils::{by, expense, on, receipt},
        transaction::{Transaction, TransactionType},
    };

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction {
                description: "Team lunch".to_owned(),
                category: "Meals".to_owned(),
                project: "Launch".to_owned(),
                ..on(date!(2025 - 02 - 10), by("Alice", expense(80.0)))
            },
            Transaction {
                description: "Monthly float".to_owned(),
                category: "Salary".to_owned(),
                ..on(date!(2025 - 02 - 01), by("Bob", receipt(1000.0)))
            },
            Transaction {
                description: "Train tickets".to_owned(),
                category: "Travel".to_owned(),
                ..on(date!(2025 - 02 - 20), by("Bob", expense(9.5)))
            },
            Transaction {
                description: "Printer paper".to_owned(),
                category: "Office Supplies".to_owned(),
                ..on(date!(2025 - 01 - 15), by("Carol", expense(100.0)))
            },
        ]
    }

    fn descriptions(transactions: &[&Transaction]) -> Vec<String> {
        transactions
            .iter()
            .map(|transaction| transaction.description.clone())
            .collect()
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let result = filter_and_sort(&[], &TransactionFilter::default(), SortConfig::default());

        assert!(result.is_empty());
    }

    #[test]
    fn default_filter_keeps_everything() {
        let transactions = sample();

        let result = filter_and_sort(
            &transactions,
            &TransactionFilter::default(),
            SortConfig::default(),
        );

        assert_eq!(result.len(), transactions.len());
        assert!(transactions.iter().all(|t| result.iter().any(|r| r.id == t.id)));
    }

    #[test]
    fn default_sort_is_newest_first() {
        let transactions = sample();

        let result = filter_and_sort(
            &transactions,
            &TransactionFilter::default(),
            SortConfig::default(),
        );

        let dates: Vec<_> = result.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 02 - 20),
                date!(2025 - 02 - 10),
                date!(2025 - 02 - 01),
                date!(2025 - 01 - 15)
            ]
        );
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let transactions = sample();
        let search = |text: &str| {
            let filter = TransactionFilter {
                search: text.to_owned(),
                ..Default::default()
            };
            filter_and_sort(&transactions, &filter, SortConfig::default()).len()
        };

        assert_eq!(search("LUNCH"), 1);
        assert_eq!(search("LAUNCH"), 1);
        assert_eq!(search("travel"), 1);
        assert_eq!(search("carol"), 1);
        assert_eq!(search("default project"), 3);
        assert_eq!(search("nothing matches"), 0);
    }

    #[test]
    fn search_matches_any_field() {
        let transactions = vec![Transaction {
            description: "Coffee".to_owned(),
            category: "Meals".to_owned(),
            ..by("Alice", expense(4.0))
        }];
        let filter = TransactionFilter {
            search: "ali".to_owned(),
            ..Default::default()
        };

        let result = filter_and_sort(&transactions, &filter, SortConfig::default());

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn dimensions_are_combined() {
        let transactions = sample();
        let filter = TransactionFilter {
            kind: Some(TransactionType::Expense),
            person: Selection::Only("Bob".to_owned()),
            ..Default::default()
        };

        let result = filter_and_sort(&transactions, &filter, SortConfig::default());

        assert_eq!(descriptions(&result), vec!["Train tickets"]);
    }

    #[test]
    fn category_and_project_match_exactly() {
        let transactions = sample();
        let filter = TransactionFilter {
            category: Selection::Only("meals".to_owned()),
            ..Default::default()
        };

        assert!(filter_and_sort(&transactions, &filter, SortConfig::default()).is_empty());

        let filter = TransactionFilter {
            project: Selection::Only("Launch".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            descriptions(&filter_and_sort(&transactions, &filter, SortConfig::default())),
            vec!["Team lunch"]
        );
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let transactions = sample();
        let filter = TransactionFilter {
            start_date: Some(date!(2025 - 02 - 01)),
            end_date: Some(date!(2025 - 02 - 10)),
            ..Default::default()
        };

        let result = filter_and_sort(&transactions, &filter, SortConfig::default());

        assert_eq!(descriptions(&result), vec!["Team lunch", "Monthly float"]);
    }

    #[test]
    fn adding_a_constraint_never_grows_the_result() {
        let transactions = sample();
        let base = TransactionFilter::default();
        let all = filter_and_sort(&transactions, &base, SortConfig::default()).len();
        let constrained = [
            TransactionFilter {
                search: "a".to_owned(),
                ..base.clone()
            },
            TransactionFilter {
                kind: Some(TransactionType::Receipt),
                ..base.clone()
            },
            TransactionFilter {
                person: Selection::Only("Alice".to_owned()),
                ..base.clone()
            },
            TransactionFilter {
                project: Selection::Only("Default Project".to_owned()),
                ..base.clone()
            },
            TransactionFilter {
                category: Selection::Only("Travel".to_owned()),
                ..base.clone()
            },
            TransactionFilter {
                start_date: Some(date!(2025 - 02 - 15)),
                ..base.clone()
            },
            TransactionFilter {
                end_date: Some(date!(2025 - 01 - 31)),
                ..base.clone()
            },
        ];

        for filter in constrained {
            let count = filter_and_sort(&transactions, &filter, SortConfig::default()).len();
            assert!(count <= all, "{filter:?} returned {count} of {all}");
        }
    }

    #[test]
    fn amount_sorts_numerically() {
        let transactions = sample();
        let sort = SortConfig {
            field: SortField::Amount,
            direction: SortDirection::Asc,
        };

        let result = filter_and_sort(&transactions, &TransactionFilter::default(), sort);

        let amounts: Vec<_> = result.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![9.5, 80.0, 100.0, 1000.0]);
    }

    #[test]
    fn nan_amounts_do_not_break_sorting() {
        let transactions = vec![expense(3.0), expense(f64::NAN), expense(1.0), expense(2.0)];
        let sort = SortConfig {
            field: SortField::Amount,
            direction: SortDirection::Asc,
        };

        let result = filter_and_sort(&transactions, &TransactionFilter::default(), sort);

        assert_eq!(result.len(), 4);
        assert_eq!(result[0].amount, 1.0);
        assert!(result[3].amount.is_nan());
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let first = on(date!(2025 - 05 - 05), expense(1.0));
        let second = on(date!(2025 - 05 - 05), expense(2.0));
        let older = on(date!(2025 - 05 - 01), expense(3.0));
        let transactions = vec![first.clone(), older.clone(), second.clone()];

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sort = SortConfig {
                field: SortField::Date,
                direction,
            };

            let result = filter_and_sort(&transactions, &TransactionFilter::default(), sort);

            let first_at = result.iter().position(|t| t.id == first.id).unwrap();
            let second_at = result.iter().position(|t| t.id == second.id).unwrap();
            assert!(first_at < second_at, "{direction:?} reordered equal dates");
        }
    }

    #[test]
    fn text_sort_ignores_case() {
        let transactions = vec![
            by("bob", expense(1.0)),
            by("Alice", expense(1.0)),
            by("Carol", expense(1.0)),
        ];
        let sort = SortConfig {
            field: SortField::Person,
            direction: SortDirection::Asc,
        };

        let result = filter_and_sort(&transactions, &TransactionFilter::default(), sort);

        let people: Vec<_> = result.iter().map(|t| t.person.as_str()).collect();
        assert_eq!(people, vec!["Alice", "bob", "Carol"]);
    }

    #[test]
    fn compare_text_puts_lowercase_first_on_case_ties() {
        let mut collator = Collator::default();

        assert!(compare_text(&mut collator, "apple", "Apple").is_lt());
        assert!(compare_text(&mut collator, "Apple", "banana").is_lt());
        assert!(compare_text(&mut collator, "same", "same").is_eq());
    }

    #[test]
    fn accented_labels_sort_with_their_base_letter() {
        let transactions = vec![
            by("Zoe", expense(1.0)),
            by("Émile", expense(1.0)),
            by("Bob", expense(1.0)),
        ];
        let sort = SortConfig {
            field: SortField::Person,
            direction: SortDirection::Asc,
        };

        let result = filter_and_sort(&transactions, &TransactionFilter::default(), sort);

        let people: Vec<_> = result.iter().map(|t| t.person.as_str()).collect();
        assert_eq!(people, vec!["Bob", "Émile", "Zoe"]);
    }

    #[test]
    fn text_and_amount_sorts_are_stable() {
        let first = by("Dana", expense(5.0));
        let second = by("Dana", expense(5.0));
        let other = by("Abe", expense(9.0));
        let transactions = vec![first.clone(), other, second.clone()];

        for field in [SortField::Person, SortField::Amount] {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let sort = SortConfig { field, direction };

                let result = filter_and_sort(&transactions, &TransactionFilter::default(), sort);

                let first_at = result.iter().position(|t| t.id == first.id).unwrap();
                let second_at = result.iter().position(|t| t.id == second.id).unwrap();
                assert!(first_at < second_at, "{field:?} {direction:?} reordered equal keys");
            }
        }
    }

    #[test]
    fn matches_agrees_with_filter_and_sort() {
        let transactions = sample();
        let filter = TransactionFilter {
            search: "a".to_owned(),
            kind: Some(TransactionType::Expense),
            ..Default::default()
        };

        let kept = filter_and_sort(&transactions, &filter, SortConfig::default());

        for transaction in &transactions {
            let is_kept = kept.iter().any(|t| t.id == transaction.id);
            assert_eq!(filter.matches(transaction), is_kept, "{}", transaction.description);
        }
    }

    #[test]
    fn type_sort_puts_expenses_before_receipts() {
        let transactions = vec![receipt(1.0), expense(1.0)];
        let sort = SortConfig {
            field: SortField::Type,
            direction: SortDirection::Asc,
        };

        let result = filter_and_sort(&transactions, &TransactionFilter::default(), sort);

        assert_eq!(result[0].kind, TransactionType::Expense);
    }

    #[test]
    fn filter_does_not_mutate_input() {
        let transactions = sample();
        let before = transactions.clone();

        let _ = filter_and_sort(
            &transactions,
            &TransactionFilter::default(),
            SortConfig::default(),
        );

        assert_eq!(transactions, before);
    }

    #[test]
    fn toggle_switches_direction_on_same_field() {
        let sort = SortConfig::default().toggle(SortField::Amount);
        assert_eq!(sort.direction, SortDirection::Asc);

        let sort = sort.toggle(SortField::Amount);
        assert_eq!(sort.direction, SortDirection::Desc);

        let sort = sort.toggle(SortField::Person);
        assert_eq!(
            sort,
            SortConfig {
                field: SortField::Person,
                direction: SortDirection::Asc
            }
        );
    }

    #[test]
    fn filter_options_are_distinct_in_first_seen_order() {
        let options = FilterOptions::from_transactions(&sample());

        assert_eq!(options.people, vec!["Alice", "Bob", "Carol"]);
        assert_eq!(options.projects, vec!["Launch", "Default Project"]);
        assert_eq!(
            options.categories,
            vec!["Meals", "Salary", "Travel", "Office Supplies"]
        );
    }

    #[test]
    fn selection_from_option() {
        assert_eq!(Selection::from(None), Selection::All);
        assert_eq!(
            Selection::from(Some("Bob".to_owned())),
            Selection::Only("Bob".to_owned())
        );
    }
}
