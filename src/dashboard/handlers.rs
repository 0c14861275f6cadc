//! HTTP handler for the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    dashboard::aggregation::build_dashboard,
    expense::get_expenses,
    income::get_incomes,
    timezone::get_local_date,
};

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading income and expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for the owner's income and expense overview.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let records = get_expenses(user_id, &connection)
        .and_then(|expenses| Ok((expenses, get_incomes(user_id, &connection)?)));

    match records {
        Ok((expenses, incomes)) => Json(build_dashboard(expenses, incomes, today)).into_response(),
        Err(error) => {
            tracing::error!("Could not build dashboard for user {user_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::Duration;

    use crate::{
        UserID,
        db::initialize,
        expense::{NewExpense, create_expense},
        income::{NewIncome, create_income},
        test_utils::parse_json_body,
        timezone::get_local_date,
    };

    use super::{DashboardState, get_dashboard_endpoint};

    const TIMEZONE: &str = "Etc/UTC";

    fn get_test_state() -> DashboardState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: TIMEZONE.to_owned(),
        }
    }

    #[tokio::test]
    async fn dashboard_summarizes_owner_records() {
        let state = get_test_state();
        let today = get_local_date(TIMEZONE).unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            create_income(
                NewIncome {
                    user_id: UserID::new(1),
                    source: "Salary".to_owned(),
                    amount: 2000.0,
                    date: today,
                    icon: None,
                },
                &connection,
            )
            .unwrap();
            for (user_id, amount, days_ago) in [(1, 150.0, 0), (1, 50.0, 45), (2, 999.0, 0)] {
                create_expense(
                    NewExpense {
                        user_id: UserID::new(user_id),
                        category: "Food".to_owned(),
                        amount,
                        date: today - Duration::days(days_ago),
                        icon: None,
                    },
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_dashboard_endpoint(State(state), Extension(UserID::new(1))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["totalIncome"], 2000.0);
        assert_eq!(body["totalExpense"], 200.0);
        assert_eq!(body["totalBalance"], 1800.0);
        assert_eq!(body["last30DaysExpenses"]["total"], 150.0);
        assert_eq!(body["last60DaysIncome"]["total"], 2000.0);
        assert_eq!(body["recentTransactions"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn dashboard_without_records_is_zero() {
        let state = get_test_state();

        let response = get_dashboard_endpoint(State(state), Extension(UserID::new(1))).await;

        let body = parse_json_body(response).await;
        assert_eq!(body["totalBalance"], 0.0);
        assert_eq!(body["recentTransactions"], serde_json::json!([]));
    }
}
