//! The dashboard: every report for one date range, person and project.

use serde::Serialize;
use time::Date;

use crate::{
    balance::{PersonBalance, compute_person_balances},
    filter::Selection,
    report::{
        CategoryReport, DailyExpenses, ReceiptSeries, aggregate_by_category,
        aggregate_receipts_by_date_and_category, group_expenses_by_project_for_date, unique_dates,
    },
    threshold::ThresholdLookup,
    transaction::{Transaction, TransactionType},
};

/// Which transactions the dashboard is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardFilter {
    /// The first day to include.
    pub start_date: Date,
    /// The last day to include.
    pub end_date: Date,
    /// The person to include.
    pub person: Selection,
    /// The project to include.
    pub project: Selection,
}

impl DashboardFilter {
    /// The month up to and including `today`, for everyone and every project.
    ///
    /// The start is the same day one month earlier, clamped to the end of a
    /// shorter month (e.g. 31 March gives 28 or 29 February).
    pub fn last_month(today: Date) -> Self {
        let start_date = today
            .replace_day(1)
            .ok()
            .and_then(|first_of_month| first_of_month.previous_day())
            .map(|end_of_previous_month| {
                let day = today.day().min(end_of_previous_month.day());
                end_of_previous_month
                    .replace_day(day)
                    .unwrap_or(end_of_previous_month)
            })
            .unwrap_or(today);

        Self {
            start_date,
            end_date: today,
            person: Selection::All,
            project: Selection::All,
        }
    }

    /// Whether `transaction` is shown on the dashboard.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        transaction.date >= self.start_date
            && transaction.date <= self.end_date
            && self.person.matches(&transaction.person)
            && self.project.matches(&transaction.project)
    }
}

/// The reports shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard<'a> {
    /// The transactions that passed the filter, in input order.
    pub transactions: Vec<&'a Transaction>,
    /// Balance and status of each person.
    pub person_balances: Vec<PersonBalance>,
    /// Expense totals per category.
    pub expenses_by_category: CategoryReport,
    /// Receipts per category over time.
    pub receipts_by_date_and_category: Vec<ReceiptSeries>,
    /// Expenses per project for each day that has any, newest day first.
    pub daily_expenses: Vec<DailyExpenses<'a>>,
}

impl<'a> Dashboard<'a> {
    /// Filter `transactions` and build every dashboard report from the result.
    pub fn build(
        transactions: &'a [Transaction],
        filter: &DashboardFilter,
        thresholds: &impl ThresholdLookup,
    ) -> Self {
        let filtered: Vec<&'a Transaction> = transactions
            .iter()
            .filter(|transaction| filter.matches(transaction))
            .collect();

        let daily_expenses = unique_dates(filtered.iter().copied())
            .into_iter()
            .filter_map(|date| group_expenses_by_project_for_date(filtered.iter().copied(), date))
            .collect();

        Self {
            person_balances: compute_person_balances(filtered.iter().copied(), thresholds),
            expenses_by_category: aggregate_by_category(
                filtered.iter().copied(),
                TransactionType::Expense,
            ),
            receipts_by_date_and_category: aggregate_receipts_by_date_and_category(
                filtered.iter().copied(),
            ),
            daily_expenses,
            transactions: filtered,
        }
    }
}
