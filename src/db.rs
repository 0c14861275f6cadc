//! Creates the application's tables.

use rusqlite::{Connection, TransactionBehavior, Transaction as SqlTransaction};

use crate::{
    Error, budget::create_budget_table, expense::create_expense_table,
    income::create_income_table,
};

/// Create the tables and indexes for the domain models if they do not already exist.
///
/// All tables are created inside one exclusive transaction, so either every table is
/// created or none are.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;
    create_income_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
