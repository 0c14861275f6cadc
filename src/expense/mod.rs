//! Expenses: the spending that budgets are measured against.

mod create;
mod db;
mod delete;
mod list;

pub use create::create_expense_endpoint;
pub use db::{Expense, NewExpense, create_expense, create_expense_table, get_expenses};

#[cfg(test)]
pub use db::delete_expense;
pub use delete::delete_expense_endpoint;
pub use list::{download_expenses_endpoint, list_expenses_endpoint};
