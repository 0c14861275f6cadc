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
    income::db::{Income, get_incomes},
};

const INCOME_DOWNLOAD_FILE_NAME: &str = "income_details.csv";

/// The state needed to list income.
#[derive(Debug, Clone)]
pub struct ListIncomesState {
    /// The database connection for managing income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListIncomesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the owner's income, newest first.
pub async fn list_incomes_endpoint(
    State(state): State<ListIncomesState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_incomes(user_id, &connection) {
        Ok(incomes) => Json(incomes).into_response(),
        Err(error) => error.into_response(),
    }
}

const INCOME_CSV_HEADERS: [&str; 3] = ["Source", "Amount", "Date"];

#[derive(Serialize)]
struct IncomeRow<'a> {
    source: &'a str,
    amount: f64,
    date: String,
}

/// A route handler for downloading the owner's income as a CSV file.
pub async fn download_incomes_endpoint(
    State(state): State<ListIncomesState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let incomes = match get_incomes(user_id, &connection) {
        Ok(incomes) => incomes,
        Err(error) => return error.into_response(),
    };

    let rows = incomes.iter().map(|income: &Income| IncomeRow {
        source: &income.source,
        amount: income.amount,
        date: income.date.to_string(),
    });

    match write_csv(&INCOME_CSV_HEADERS, rows) {
        Ok(csv) => csv_attachment(INCOME_DOWNLOAD_FILE_NAME, csv),
        Err(error) => error.into_response(),
    }
}
