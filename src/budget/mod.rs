//! Monthly per-category budgets and their spending.

mod aggregate;
mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod period;
mod summary;

pub use create::create_budget_endpoint;
pub use db::{NewBudget, create_budget, create_budget_table};
pub use delete::delete_budget_endpoint;
pub use domain::{Budget, BudgetId, BudgetStatus, Utilization};
pub use edit::edit_budget_endpoint;
pub use list::list_budgets_endpoint;
pub use period::Period;
pub use summary::get_budget_summary_endpoint;
