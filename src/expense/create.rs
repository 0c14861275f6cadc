//! Defines the endpoint for recording an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, UserID,
    expense::db::{NewExpense, create_expense},
};

/// The state needed to record an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for recording an expense.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseForm {
    /// The label the expense is budgeted under.
    pub category: Option<String>,
    /// How much was spent.
    pub amount: Option<f64>,
    /// The day the money was spent, e.g. "2025-03-14".
    pub date: Option<Date>,
    /// An optional icon chosen by the client.
    pub icon: Option<String>,
}

impl ExpenseForm {
    fn validate(self, user_id: UserID) -> Result<NewExpense, Error> {
        let category = self.category.as_deref().map(str::trim).unwrap_or_default();

        let (Some(amount), Some(date)) = (self.amount, self.date) else {
            return Err(missing_fields());
        };

        if category.is_empty() {
            return Err(missing_fields());
        }

        if amount < 0.0 || !amount.is_finite() {
            return Err(Error::InvalidField(
                "Amount must be zero or more".to_owned(),
            ));
        }

        Ok(NewExpense {
            user_id,
            category: category.to_owned(),
            amount,
            date,
            icon: self.icon,
        })
    }
}

fn missing_fields() -> Error {
    Error::MissingFields("Category, amount, and date are required".to_owned())
}

/// A route handler for recording an expense, responds with the new expense.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<ExpenseForm>, JsonRejection>,
) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    let new_expense = match form.validate(user_id) {
        Ok(new_expense) => new_expense,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_expense(new_expense, &connection) {
        Ok(expense) => Json(expense).into_response(),
        Err(error) => {
            tracing::error!("Could not create expense for user {user_id}: {error}");
            error.into_response()
        }
    }
}
