//! Income records and the database operations for them.

use rusqlite::{Connection, Row, params};
use serde::Serialize;
use time::Date;

use crate::{Error, UserID};

/// Database identifier for an income record.
pub type IncomeId = i64;

/// Money received by a user on a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    /// The id for the income record.
    pub id: IncomeId,
    /// The user that received the income.
    pub user_id: UserID,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    /// How much was received.
    pub amount: f64,
    /// The day the money was received.
    pub date: Date,
    /// An optional icon chosen by the client.
    pub icon: Option<String>,
}

/// The data needed to record income.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    /// The user receiving the income.
    pub user_id: UserID,
    /// Where the money came from.
    pub source: String,
    /// How much was received.
    pub amount: f64,
    /// The day the money was received.
    pub date: Date,
    /// An optional icon chosen by the client.
    pub icon: Option<String>,
}

/// Create the income table.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            source TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            date TEXT NOT NULL,
            icon TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_income_user_date ON income(user_id, date);",
    )?;

    Ok(())
}

/// Record income and return it with its generated ID.
pub fn create_income(new_income: NewIncome, connection: &Connection) -> Result<Income, Error> {
    let id = connection.query_row(
        "INSERT INTO income (user_id, source, amount, date, icon) VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id",
        params![
            new_income.user_id.as_i64(),
            new_income.source,
            new_income.amount,
            new_income.date,
            new_income.icon
        ],
        |row| row.get(0),
    )?;

    Ok(Income {
        id,
        user_id: new_income.user_id,
        source: new_income.source,
        amount: new_income.amount,
        date: new_income.date,
        icon: new_income.icon,
    })
}

/// Retrieve all of the owner's income, newest first.
pub fn get_incomes(user_id: UserID, connection: &Connection) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, source, amount, date, icon FROM income
            WHERE user_id = ?1
            ORDER BY date DESC, id DESC",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}

/// Delete one of the owner's income records.
///
/// # Errors
/// Returns [Error::DeleteMissingIncome] if the record does not exist or belongs to another user.
pub fn delete_income(
    income_id: IncomeId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM income WHERE id = ?1 AND user_id = ?2",
        params![income_id, user_id.as_i64()],
    )?;

    match rows_affected {
        0 => Err(Error::DeleteMissingIncome),
        _ => Ok(()),
    }
}

fn map_row(row: &Row) -> Result<Income, rusqlite::Error> {
    Ok(Income {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        source: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        icon: row.get(5)?,
    })
}
