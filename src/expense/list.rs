//! Defines the endpoints for listing and downloading a user's expenses.

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
    csv_export::{csv_attachment, write_csv},
    expense::db::{Expense, get_expenses},
};

/// The file name used for expense downloads.
pub const EXPENSE_DOWNLOAD_FILE_NAME: &str = "expense_details.csv";

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the owner's expenses, newest first.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_expenses(user_id, &connection) {
        Ok(expenses) => Json(expenses).into_response(),
        Err(error) => {
            tracing::error!("Could not get expenses for user {user_id}: {error}");
            error.into_response()
        }
    }
}

const EXPENSE_CSV_HEADERS: [&str; 3] = ["Category", "Amount", "Date"];

#[derive(Serialize)]
struct ExpenseRow<'a> {
    category: &'a str,
    amount: f64,
    date: String,
}

impl<'a> From<&'a Expense> for ExpenseRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            category: &expense.category,
            amount: expense.amount,
            date: expense.date.to_string(),
        }
    }
}

/// A route handler for downloading the owner's expenses as a CSV file.
pub async fn download_expenses_endpoint(
    State(state): State<ListExpensesState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let csv = get_expenses(user_id, &connection).and_then(|expenses| {
        write_csv(&EXPENSE_CSV_HEADERS, expenses.iter().map(ExpenseRow::from))
    });

    match csv {
        Ok(csv) => csv_attachment(EXPENSE_DOWNLOAD_FILE_NAME, csv),
        Err(error) => {
            tracing::error!("Could not export expenses for user {user_id}: {error}");
            error.into_response()
        }
    }
}
