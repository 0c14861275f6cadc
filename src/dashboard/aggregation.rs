//! Income and expense aggregation for the dashboard.

use std::cmp::Reverse;

use serde::Serialize;
use time::{Date, Duration};

use crate::{expense::Expense, income::Income};

/// How many of the newest expenses, and separately incomes, go into the recent transactions.
pub(super) const RECENT_TRANSACTION_COUNT: usize = 5;
/// How many days back the expense window reaches.
pub(super) const EXPENSE_WINDOW_DAYS: i64 = 30;
/// How many days back the income window reaches.
pub(super) const INCOME_WINDOW_DAYS: i64 = 60;

/// An expense or income record tagged with its kind, e.g. `{"type": "income", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(super) enum RecentTransaction {
    Income(Income),
    Expense(Expense),
}

impl RecentTransaction {
    fn date(&self) -> Date {
        match self {
            RecentTransaction::Income(income) => income.date,
            RecentTransaction::Expense(expense) => expense.date,
        }
    }
}

/// The records dated within a window and their sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(super) struct WindowTotal<T> {
    pub total: f64,
    pub transactions: Vec<T>,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Dashboard {
    pub total_balance: f64,
    pub total_income: f64,
    pub total_expense: f64,
    #[serde(rename = "last30DaysExpenses")]
    pub last_30_days_expenses: WindowTotal<Expense>,
    #[serde(rename = "last60DaysIncome")]
    pub last_60_days_income: WindowTotal<Income>,
    pub recent_transactions: Vec<RecentTransaction>,
}

/// Build the dashboard from all of the owner's records.
///
/// `expenses` and `incomes` must be ordered newest first. The expense and income windows
/// include records dated on or after 30 and 60 days before `today` respectively.
pub(super) fn build_dashboard(
    expenses: Vec<Expense>,
    incomes: Vec<Income>,
    today: Date,
) -> Dashboard {
    let total_income = incomes.iter().map(|income| income.amount).sum::<f64>();
    let total_expense = expenses.iter().map(|expense| expense.amount).sum::<f64>();
    let recent_transactions = merge_recent(&expenses, &incomes, RECENT_TRANSACTION_COUNT);

    let expense_window_start = days_before(today, EXPENSE_WINDOW_DAYS);
    let last_30_days_expenses = window_total(
        expenses
            .into_iter()
            .filter(|expense| expense.date >= expense_window_start)
            .collect(),
        |expense| expense.amount,
    );

    let income_window_start = days_before(today, INCOME_WINDOW_DAYS);
    let last_60_days_income = window_total(
        incomes
            .into_iter()
            .filter(|income| income.date >= income_window_start)
            .collect(),
        |income| income.amount,
    );

    Dashboard {
        total_balance: total_income - total_expense,
        total_income,
        total_expense,
        last_30_days_expenses,
        last_60_days_income,
        recent_transactions,
    }
}

fn window_total<T>(transactions: Vec<T>, amount: impl Fn(&T) -> f64) -> WindowTotal<T> {
    WindowTotal {
        total: transactions.iter().map(amount).sum(),
        transactions,
    }
}

/// The `count` newest incomes and `count` newest expenses, merged newest first.
fn merge_recent(expenses: &[Expense], incomes: &[Income], count: usize) -> Vec<RecentTransaction> {
    let mut recent: Vec<RecentTransaction> = incomes
        .iter()
        .take(count)
        .cloned()
        .map(RecentTransaction::Income)
        .chain(
            expenses
                .iter()
                .take(count)
                .cloned()
                .map(RecentTransaction::Expense),
        )
        .collect();

    recent.sort_by_key(|transaction| Reverse(transaction.date()));

    recent
}

fn days_before(date: Date, days: i64) -> Date {
    date.checked_sub(Duration::days(days)).unwrap_or(Date::MIN)
}
