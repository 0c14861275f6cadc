//! Defines the endpoint that summarizes the current month's budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error, UserID,
    budget::{Budget, BudgetStatus, Period, list::get_budgets_with_spending},
    timezone::get_local_date,
};

/// The number of budgets included in the summary for a quick view.
pub const SUMMARY_BUDGET_COUNT: usize = 5;

/// The state needed to summarize budgets.
#[derive(Debug, Clone)]
pub struct BudgetSummaryState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// How many budgets fall into each status bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Budgets with less than half spent.
    pub good: usize,
    /// Budgets with at least half spent.
    pub moderate: usize,
    /// Budgets with at least 80% spent.
    pub warning: usize,
    /// Budgets that are fully spent.
    pub exceeded: usize,
}

/// Totals across all of a month's active budgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// The number of active budgets.
    pub total_budgets: usize,
    /// The sum of the budget amounts.
    pub total_budget: f64,
    /// The sum of the spent amounts.
    pub total_spent: f64,
    /// Total budget minus total spent, negative when overspent overall.
    pub total_remaining: f64,
    /// Total spent as a percentage of total budget, not clamped.
    pub utilization_percentage: f64,
    /// How many budgets are in each status bucket.
    pub budgets_by_status: StatusCounts,
    /// The first few budgets, ordered by category.
    pub budgets: Vec<Budget>,
}

impl BudgetSummary {
    /// Summarize `budgets`, which should already have up to date spent amounts.
    pub fn new(budgets: Vec<Budget>) -> Self {
        let total_budget: f64 = budgets.iter().map(|budget| budget.budget_amount).sum();
        let total_spent: f64 = budgets.iter().map(|budget| budget.spent_amount).sum();

        let mut budgets_by_status = StatusCounts::default();
        for budget in &budgets {
            match budget.utilization().status {
                BudgetStatus::Good => budgets_by_status.good += 1,
                BudgetStatus::Moderate => budgets_by_status.moderate += 1,
                BudgetStatus::Warning => budgets_by_status.warning += 1,
                BudgetStatus::Exceeded => budgets_by_status.exceeded += 1,
            }
        }

        let utilization_percentage = if total_budget > 0.0 {
            total_spent / total_budget * 100.0
        } else {
            0.0
        };

        Self {
            total_budgets: budgets.len(),
            total_budget,
            total_spent,
            total_remaining: total_budget - total_spent,
            utilization_percentage,
            budgets_by_status,
            budgets: budgets.into_iter().take(SUMMARY_BUDGET_COUNT).collect(),
        }
    }
}

/// A route handler for summarizing the owner's budgets for the current month.
///
/// The summary either reflects every budget's recomputed spending or the request fails.
pub async fn get_budget_summary_endpoint(
    State(state): State<BudgetSummaryState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let period = match get_local_date(&state.local_timezone).and_then(Period::containing) {
        Ok(period) => period,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_budgets_with_spending(user_id, period, &connection) {
        Ok(budgets) => Json(BudgetSummary::new(budgets)).into_response(),
        Err(error) => {
            tracing::error!("Could not summarize budgets for user {user_id}: {error}");
            error.into_response()
        }
    }
}
