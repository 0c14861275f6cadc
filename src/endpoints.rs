//! The API endpoints URIs.
//!
//! Endpoints that take a parameter use axum's path syntax, e.g. '/api/v1/budget/{budget_id}'.

/// The route for checking that the server is running.
pub const PING: &str = "/ping";

/// The route for the income and expense overview.
pub const DASHBOARD: &str = "/api/v1/dashboard";

/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/v1/budget";
/// The route for the summary of the current month's budgets.
pub const BUDGET_SUMMARY: &str = "/api/v1/budget/summary";
/// The route to update and delete a budget.
pub const BUDGET: &str = "/api/v1/budget/{budget_id}";

/// The route to list and create expenses.
pub const EXPENSES: &str = "/api/v1/expense";
/// The route to delete an expense.
pub const EXPENSE: &str = "/api/v1/expense/{expense_id}";
/// The route to download expenses as a CSV file.
pub const EXPENSE_DOWNLOAD: &str = "/api/v1/expense/download";

/// The route to list and create income.
pub const INCOMES: &str = "/api/v1/income";
/// The route to delete income.
pub const INCOME: &str = "/api/v1/income/{income_id}";
/// The route to download income as a CSV file.
pub const INCOME_DOWNLOAD: &str = "/api/v1/income/download";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes the path contains exactly one parameter in braces.
#[cfg(test)]
pub(crate) fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end + 1..])
        }
        _ => endpoint_path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{BUDGET, EXPENSES, format_endpoint};

    #[test]
    fn formats_parameter() {
        assert_eq!(format_endpoint(BUDGET, 12), "/api/v1/budget/12");
    }

    #[test]
    fn path_without_parameter_is_unchanged() {
        assert_eq!(format_endpoint(EXPENSES, 12), EXPENSES);
    }
}
