//! Recomputes how much has been spent against budgets from the expense records.
//!
//! Spent amounts are recomputed in full each time budgets are read rather than
//! kept up to date as expenses change.

use rusqlite::{Connection, params};

use crate::{
    Error, UserID,
    budget::{Budget, Period, db::set_spent_amount},
};

/// Sum the amounts of the owner's expenses in `category` dated within `period`.
///
/// Returns zero if there are no matching expenses.
pub fn compute_spent_amount(
    user_id: UserID,
    category: &str,
    period: Period,
    connection: &Connection,
) -> Result<f64, Error> {
    let total: f64 = connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expense
            WHERE user_id = ?1 AND category = ?2 AND date >= ?3 AND date < ?4",
        )?
        .query_row(
            params![user_id.as_i64(), category, period.start(), period.end()],
            |row| row.get(0),
        )?;

    Ok(total)
}

/// Recompute and store the spent amount of every budget in `budgets`.
///
/// The updates are made in a single SQL transaction, either all of the spent amounts are
/// stored or none are.
///
/// # Errors
/// Returns an error if any of the sums or updates fail.
pub fn refresh_spent_amounts(budgets: &mut [Budget], connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    for budget in budgets.iter_mut() {
        let spent_amount =
            compute_spent_amount(budget.user_id, &budget.category, budget.period()?, &transaction)?;
        set_spent_amount(budget.id, spent_amount, &transaction)?;
        budget.spent_amount = spent_amount;
    }

    transaction.commit()?;

    Ok(())
}
