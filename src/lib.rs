//! Expense tracker is a REST API for tracking personal income, expenses and
//! monthly budgets.
//!
//! Budgets are per-category monthly spending limits. The amount spent against
//! a budget is never entered by hand, it is recomputed from the owner's
//! expense records whenever budgets are read.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod budget;
mod csv_export;
mod dashboard;
mod db;
mod endpoints;
mod expense;
mod health;
mod income;
mod logging;
mod not_found;
mod owner;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use budget::{Budget, BudgetStatus, NewBudget, Period, Utilization, create_budget};
pub use db::initialize as initialize_db;
pub use expense::{NewExpense, create_expense};
pub use income::{NewIncome, create_income};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use owner::{OWNER_HEADER, UserID};
pub use routing::build_router;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more required fields were missing from the request body.
    ///
    /// The string describes which fields are required.
    #[error("{0}")]
    MissingFields(String),

    /// A field was present but its value is not allowed, e.g. a negative amount.
    #[error("{0}")]
    InvalidField(String),

    /// The request body could not be parsed as JSON.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The month is not in the range 1-12 or the year cannot be represented as a date.
    #[error("invalid budget period {month}/{year}")]
    InvalidPeriod {
        /// The month that was requested.
        month: u8,
        /// The year that was requested.
        year: i32,
    },

    /// An active budget already exists for the owner, category and period.
    #[error("Budget for {category} in {month}/{year} already exists")]
    DuplicateBudget {
        /// The budget's category.
        category: String,
        /// The budget's month.
        month: u8,
        /// The budget's year.
        year: i32,
    },

    /// The owner ID header was missing or could not be parsed.
    #[error("missing or invalid owner ID")]
    MissingOwner,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a budget that does not exist or has been deleted.
    #[error("Budget not found")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist or has been deleted.
    #[error("Budget not found")]
    DeleteMissingBudget,

    /// Tried to delete an expense that is not in the database.
    #[error("Expense not found")]
    DeleteMissingExpense,

    /// Tried to delete an income record that is not in the database.
    #[error("Income not found")]
    DeleteMissingIncome,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The local timezone name is not a canonical timezone.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while writing records as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields(_)
            | Error::InvalidField(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidPeriod { .. }
            | Error::DuplicateBudget { .. } => StatusCode::BAD_REQUEST,
            Error::MissingOwner => StatusCode::UNAUTHORIZED,
            Error::NotFound
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget
            | Error::DeleteMissingExpense
            | Error::DeleteMissingIncome => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::CsvError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);

            return (
                status,
                Json(json!({
                    "message": "Something went wrong",
                    "error": self.to_string(),
                })),
            )
                .into_response();
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
