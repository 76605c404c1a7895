//! Category and time aggregation for the category analysis and dashboard
//! reports.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{
    balance::Sum,
    transaction::{Transaction, TransactionType},
};

// ============================================================================
// CATEGORY TOTALS
// ============================================================================

/// The total amount and number of transactions in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category label, compared exactly (no case folding).
    pub category: String,
    /// The sum of the category's amounts.
    pub total: f64,
    /// The number of transactions in the category.
    pub count: usize,
}

/// Category totals sorted from largest to smallest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryReport {
    /// The categories, largest total first. Ties keep first-seen order.
    pub categories: Vec<CategoryTotal>,
    /// The sum of every category total.
    pub total: f64,
}

impl CategoryReport {
    /// The category with the largest total, if there are any.
    pub fn top(&self) -> Option<&CategoryTotal> {
        self.categories.first()
    }

    /// The fraction (0 to 1) of the report total that `category` makes up.
    ///
    /// Returns 0 when the report total is zero.
    pub fn share(&self, category: &CategoryTotal) -> f64 {
        if self.total == 0.0 {
            0.0
        } else {
            category.total / self.total
        }
    }

    /// Each category paired with its [share](CategoryReport::share).
    pub fn shares(&self) -> impl Iterator<Item = (&CategoryTotal, f64)> {
        self.categories
            .iter()
            .map(|category| (category, self.share(category)))
    }

    /// The number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether no transactions of the requested type were found.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Total the transactions of type `kind` by category.
///
/// Transactions of the other type are ignored entirely; the category analysis
/// uses `Expense` to show where money goes.
pub fn aggregate_by_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    kind: TransactionType,
) -> CategoryReport {
    let mut groups: Vec<(&str, Sum, usize)> = Vec::new();
    let mut index_of: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions.into_iter().filter(|t| t.kind == kind) {
        let category = transaction.category.as_str();
        let index = *index_of.entry(category).or_insert_with(|| {
            groups.push((category, Sum::default(), 0));
            groups.len() - 1
        });

        let (_, total, count) = &mut groups[index];
        total.add(transaction.amount);
        *count += 1;
    }

    let mut grand_total = Sum::default();
    let mut categories: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, total, count)| {
            grand_total.add(total.value());
            CategoryTotal {
                category: category.to_owned(),
                total: total.value(),
                count,
            }
        })
        .collect();

    categories.sort_by(|a, b| b.total.total_cmp(&a.total));

    CategoryReport {
        categories,
        total: grand_total.value(),
    }
}

// ============================================================================
// RECEIPTS OVER TIME
// ============================================================================

/// The receipts of one category, summed per day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptSeries {
    /// The category label.
    pub category: String,
    /// Each date (as midnight UTC) mapped to the sum received that day.
    pub points: BTreeMap<OffsetDateTime, f64>,
}

/// Build one time series of receipts per category, for a stacked chart.
///
/// Series are in first-seen category order. Expenses are ignored.
pub fn aggregate_receipts_by_date_and_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<ReceiptSeries> {
    let mut series: Vec<(&str, BTreeMap<OffsetDateTime, Sum>)> = Vec::new();
    let mut index_of: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions
        .into_iter()
        .filter(|t| t.kind == TransactionType::Receipt)
    {
        let category = transaction.category.as_str();
        let index = *index_of.entry(category).or_insert_with(|| {
            series.push((category, BTreeMap::new()));
            series.len() - 1
        });

        let timestamp = transaction.date.midnight().assume_utc();
        series[index]
            .1
            .entry(timestamp)
            .or_default()
            .add(transaction.amount);
    }

    series
        .into_iter()
        .map(|(category, points)| ReceiptSeries {
            category: category.to_owned(),
            points: points
                .into_iter()
                .map(|(timestamp, sum)| (timestamp, sum.value()))
                .collect(),
        })
        .collect()
}

// ============================================================================
// DAILY EXPENSES
// ============================================================================

/// The expenses of one project on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectGroup<'a> {
    /// The project label.
    pub project: &'a str,
    /// The project's expenses on the day, in input order.
    pub transactions: Vec<&'a Transaction>,
    /// The sum of `transactions`.
    pub total: f64,
}

/// The expenses of a single day, grouped by project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyExpenses<'a> {
    /// The day.
    pub date: Date,
    /// One group per project with expenses that day, in first-seen order.
    pub groups: Vec<ProjectGroup<'a>>,
    /// The sum of every group total.
    pub total: f64,
}

/// Group the expenses dated exactly `date` by project.
///
/// Returns `None` when there were no expenses that day, so a day without
/// expenses is distinct from a day whose expenses sum to zero.
pub fn group_expenses_by_project_for_date<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    date: Date,
) -> Option<DailyExpenses<'a>> {
    let mut groups: Vec<(ProjectGroup<'a>, Sum)> = Vec::new();
    let mut index_of: HashMap<&'a str, usize> = HashMap::new();
    let mut day_total = Sum::default();

    for transaction in transactions
        .into_iter()
        .filter(|t| t.kind == TransactionType::Expense && t.date == date)
    {
        let project = transaction.project.as_str();
        let index = *index_of.entry(project).or_insert_with(|| {
            groups.push((
                ProjectGroup {
                    project,
                    transactions: Vec::new(),
                    total: 0.0,
                },
                Sum::default(),
            ));
            groups.len() - 1
        });

        let (group, total) = &mut groups[index];
        group.transactions.push(transaction);
        total.add(transaction.amount);
        day_total.add(transaction.amount);
    }

    if groups.is_empty() {
        return None;
    }

    let groups = groups
        .into_iter()
        .map(|(group, total)| ProjectGroup {
            total: total.value(),
            ..group
        })
        .collect();

    Some(DailyExpenses {
        date,
        groups,
        total: day_total.value(),
    })
}

/// The distinct dates in `transactions`, newest first.
pub fn unique_dates<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<Date> {
    let dates: BTreeSet<Date> = transactions.into_iter().map(|t| t.date).collect();

    dates.into_iter().rev().collect()
}
