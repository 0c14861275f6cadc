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
    income::db::{NewIncome, create_income},
};

/// The state needed to record income.
#[derive(Debug, Clone)]
pub struct CreateIncomeState {
    /// The database connection for managing income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for recording income.
#[derive(Debug, Default, Deserialize)]
pub struct IncomeForm {
    /// Where the money came from.
    pub source: Option<String>,
    /// How much was received.
    pub amount: Option<f64>,
    /// The day the money was received.
    pub date: Option<Date>,
    /// An optional icon chosen by the client.
    pub icon: Option<String>,
}

impl IncomeForm {
    fn validate(self, user_id: UserID) -> Result<NewIncome, Error> {
        let source = self.source.as_deref().map(str::trim).unwrap_or_default();

        let (false, Some(amount), Some(date)) = (source.is_empty(), self.amount, self.date) else {
            return Err(Error::MissingFields(
                "Source, amount, and date are required".to_owned(),
            ));
        };

        if amount < 0.0 || !amount.is_finite() {
            return Err(Error::InvalidField(
                "Amount must be zero or more".to_owned(),
            ));
        }

        Ok(NewIncome {
            user_id,
            source: source.to_owned(),
            amount,
            date,
            icon: self.icon,
        })
    }
}

/// A route handler for recording income, responds with the new income record.
pub async fn create_income_endpoint(
    State(state): State<CreateIncomeState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<IncomeForm>, JsonRejection>,
) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    let new_income = match form.validate(user_id) {
        Ok(new_income) => new_income,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    create_income(new_income, &connection)
        .map(|income| Json(income).into_response())
        .unwrap_or_else(|error| error.into_response())
}
