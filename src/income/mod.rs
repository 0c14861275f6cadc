//! Income records.

mod create;
mod db;
mod delete;
mod list;

pub use create::create_income_endpoint;
pub use db::{Income, NewIncome, create_income, create_income_table, get_incomes};
pub use delete::delete_income_endpoint;
pub use list::{download_incomes_endpoint, list_incomes_endpoint};
