//! Database operations for budgets.

use rusqlite::{Connection, Row, params};

use crate::{
    Error, UserID,
    budget::{Budget, BudgetId, Period, aggregate::compute_spent_amount},
};

/// The data needed to create a budget.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The user creating the budget.
    pub user_id: UserID,
    /// The expense category the budget limits.
    pub category: String,
    /// The month the budget covers.
    pub period: Period,
    /// The spending limit.
    pub budget_amount: f64,
}

/// Create the budget table and indexes.
///
/// The partial unique index allows at most one active budget per owner, category and period
/// while letting deleted budgets keep their key.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            year INTEGER NOT NULL,
            budget_amount REAL NOT NULL CHECK (budget_amount >= 0),
            spent_amount REAL NOT NULL DEFAULT 0 CHECK (spent_amount >= 0),
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_budget_active_key
            ON budget(user_id, category, month, year)
            WHERE is_active = 1;",
    )?;

    Ok(())
}

/// Create a budget with its spent amount computed from the owner's expenses.
///
/// # Errors
/// Returns [Error::DuplicateBudget] if an active budget already exists for the same owner,
/// category and period.
pub fn create_budget(new_budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    let NewBudget {
        user_id,
        category,
        period,
        budget_amount,
    } = new_budget;

    let spent_amount = compute_spent_amount(user_id, &category, period, connection)?;

    connection
        .execute(
            "INSERT INTO budget (user_id, category, month, year, budget_amount, spent_amount, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
            params![
                user_id.as_i64(),
                category,
                period.month(),
                period.year(),
                budget_amount,
                spent_amount
            ],
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
                Error::DuplicateBudget {
                    category: category.clone(),
                    month: period.month(),
                    year: period.year(),
                }
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Budget {
        id,
        user_id,
        category,
        month: period.month(),
        year: period.year(),
        budget_amount,
        spent_amount,
        is_active: true,
    })
}

/// Retrieve an active budget owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the budget does not exist, belongs to someone else or has been
/// deleted.
pub fn get_active_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, month, year, budget_amount, spent_amount, is_active
            FROM budget
            WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
        )?
        .query_row(params![budget_id, user_id.as_i64()], map_row)
        .map_err(|error| error.into())
}

/// Retrieve the owner's active budgets for `period`, ordered by category.
///
/// The spent amounts are as they were last stored, use `refresh_spent_amounts` to bring them
/// up to date.
pub fn get_active_budgets(
    user_id: UserID,
    period: Period,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, month, year, budget_amount, spent_amount, is_active
            FROM budget
            WHERE user_id = ?1 AND month = ?2 AND year = ?3 AND is_active = 1
            ORDER BY category ASC, id ASC",
        )?
        .query_map(
            params![user_id.as_i64(), period.month(), period.year()],
            map_row,
        )?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Store a new spent amount for a budget.
pub(super) fn set_spent_amount(
    budget_id: BudgetId,
    spent_amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE budget SET spent_amount = ?1 WHERE id = ?2",
        params![spent_amount, budget_id],
    )?;

    Ok(())
}

/// Change the spending limit of an active budget and return the updated budget.
///
/// # Errors
/// Returns [Error::UpdateMissingBudget] if there is no matching active budget.
pub fn update_budget_amount(
    budget_id: BudgetId,
    user_id: UserID,
    budget_amount: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    let rows_affected = connection.execute(
        "UPDATE budget SET budget_amount = ?1
        WHERE id = ?2 AND user_id = ?3 AND is_active = 1",
        params![budget_amount, budget_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    get_active_budget(budget_id, user_id, connection)
}

/// Mark a budget as deleted.
///
/// The budget's expenses are not touched.
///
/// # Errors
/// Returns [Error::DeleteMissingBudget] if there is no matching active budget.
pub fn soft_delete_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE budget SET is_active = 0 WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
        params![budget_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        month: row.get(3)?,
        year: row.get(4)?,
        budget_amount: row.get(5)?,
        spent_amount: row.get(6)?,
        is_active: row.get(7)?,
    })
}
