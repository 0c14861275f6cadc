//! Expense records and the database operations for them.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::Date;

use crate::{Error, UserID};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Money spent by a user on a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The id for the expense.
    pub id: ExpenseId,
    /// The user that recorded the expense.
    pub user_id: UserID,
    /// The label the expense is budgeted under, e.g. "Food".
    pub category: String,
    /// How much was spent, never negative.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// An optional icon (emoji or URL) chosen by the client.
    pub icon: Option<String>,
}

/// The data needed to record an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The user recording the expense.
    pub user_id: UserID,
    /// The label the expense is budgeted under.
    pub category: String,
    /// How much was spent.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// An optional icon chosen by the client.
    pub icon: Option<String>,
}

/// Create the expense table and the index used to sum expenses for budgets.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            date TEXT NOT NULL,
            icon TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_category_date
            ON expense(user_id, category, date);",
    )?;

    Ok(())
}

/// Record an expense and return it with its generated ID.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (user_id, category, amount, date, icon) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_expense.user_id.as_i64(),
            new_expense.category,
            new_expense.amount,
            new_expense.date,
            new_expense.icon
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        user_id: new_expense.user_id,
        category: new_expense.category,
        amount: new_expense.amount,
        date: new_expense.date,
        icon: new_expense.icon,
    })
}

/// Retrieve all of the owner's expenses, newest first.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, date, icon FROM expense
            WHERE user_id = ?1
            ORDER BY date DESC, id DESC",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Delete one of the owner's expenses.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if the expense does not exist or belongs to another user.
pub fn delete_expense(
    expense_id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        params![expense_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        icon: row.get(5)?,
    })
}
