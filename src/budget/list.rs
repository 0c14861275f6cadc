//! Defines the endpoint for listing the budgets of a month.

use std::sync::{Arc, Mutex};

use std::{fmt::Display, str::FromStr};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer, de};

use crate::{
    AppState, Error, UserID,
    budget::{Budget, Period, aggregate::refresh_spent_amounts, db::get_active_budgets},
    timezone::get_local_date,
};

/// The state needed to list budgets.
#[derive(Debug, Clone)]
pub struct ListBudgetsState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ListBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for listing budgets.
///
/// A missing or empty month or year defaults to the current month or year.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// The month of the year, 1-12.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub month: Option<u8>,
    /// The calendar year.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub year: Option<i32>,
}

/// Parse a query parameter, treating `?month=` the same as leaving `month` out.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

impl PeriodQuery {
    fn resolve(&self, local_timezone: &str) -> Result<Period, Error> {
        match (self.month, self.year) {
            (Some(month), Some(year)) => Period::new(month, year),
            (month, year) => {
                let today = get_local_date(local_timezone)?;
                Period::new(
                    month.unwrap_or(today.month() as u8),
                    year.unwrap_or(today.year()),
                )
            }
        }
    }
}

/// A route handler for listing the owner's active budgets for a month, with their spent
/// amounts recomputed from the current expenses.
pub async fn list_budgets_endpoint(
    State(state): State<ListBudgetsState>,
    Extension(user_id): Extension<UserID>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return Error::InvalidField(rejection.body_text()).into_response(),
    };

    let period = match query.resolve(&state.local_timezone) {
        Ok(period) => period,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_budgets_with_spending(user_id, period, &connection) {
        Ok(budgets) => Json(budgets).into_response(),
        Err(error) => {
            tracing::error!(
                "Could not list budgets for user {user_id} in {}/{}: {error}",
                period.month(),
                period.year()
            );
            error.into_response()
        }
    }
}

/// Get the owner's active budgets for `period` with up to date spent amounts.
pub(crate) fn get_budgets_with_spending(
    user_id: UserID,
    period: Period,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    let mut budgets = get_active_budgets(user_id, period, connection)?;
    refresh_spent_amounts(&mut budgets, connection)?;

    Ok(budgets)
}
