//! Defines the endpoint for creating a new budget.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserID,
    budget::{
        Period,
        db::{NewBudget, create_budget},
    },
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a budget.
///
/// Every field is required, they are optional here so that a missing field produces a
/// descriptive error rather than a generic parse error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetForm {
    /// The expense category to limit.
    pub category: Option<String>,
    /// The spending limit.
    pub budget_amount: Option<f64>,
    /// The month of the year, 1-12.
    pub month: Option<u8>,
    /// The calendar year.
    pub year: Option<i32>,
}

impl BudgetForm {
    fn validate(self, user_id: UserID) -> Result<NewBudget, Error> {
        let category = self.category.as_deref().map(str::trim).unwrap_or_default();

        let (Some(budget_amount), Some(month), Some(year)) =
            (self.budget_amount, self.month, self.year)
        else {
            return Err(missing_fields());
        };

        if category.is_empty() {
            return Err(missing_fields());
        }

        if budget_amount < 0.0 || !budget_amount.is_finite() {
            return Err(Error::InvalidField(
                "Budget amount must be zero or more".to_owned(),
            ));
        }

        Ok(NewBudget {
            user_id,
            category: category.to_owned(),
            period: Period::new(month, year)?,
            budget_amount,
        })
    }
}

fn missing_fields() -> Error {
    Error::MissingFields("Category, budget amount, month, and year are required".to_owned())
}

/// A route handler for creating a new budget, responds with the budget and 201 Created on
/// success.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<BudgetForm>, JsonRejection>,
) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    let new_budget = match form.validate(user_id) {
        Ok(new_budget) => new_budget,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_budget(new_budget, &connection) {
        Ok(budget) => (StatusCode::CREATED, Json(budget)).into_response(),
        Err(error @ Error::DuplicateBudget { .. }) => error.into_response(),
        Err(error) => {
            tracing::error!("Could not create budget for user {user_id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        UserID,
        db::initialize,
        expense::{NewExpense, create_expense},
        test_utils::parse_json_body,
    };

    use super::{BudgetForm, CreateBudgetState, create_budget_endpoint};

    fn get_test_state() -> CreateBudgetState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn food_form() -> BudgetForm {
        BudgetForm {
            category: Some("Food".to_owned()),
            budget_amount: Some(1000.0),
            month: Some(3),
            year: Some(2025),
        }
    }

    #[tokio::test]
    async fn can_create_budget() {
        let state = get_test_state();
        create_expense(
            NewExpense {
                user_id: UserID::new(1),
                category: "Food".to_owned(),
                amount: 500.0,
                date: date!(2025 - 03 - 14),
                icon: None,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = create_budget_endpoint(
            State(state),
            Extension(UserID::new(1)),
            Ok(Json(food_form())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = parse_json_body(response).await;
        assert_eq!(body["category"], "Food");
        assert_eq!(body["spentAmount"], 500.0);
        assert_eq!(body["utilizationPercentage"], 50.0);
        assert_eq!(body["status"], "moderate");
        assert_eq!(body["remainingAmount"], 500.0);
    }

    #[tokio::test]
    async fn duplicate_budget_is_rejected() {
        let state = get_test_state();
        create_budget_endpoint(
            State(state.clone()),
            Extension(UserID::new(1)),
            Ok(Json(food_form())),
        )
        .await;

        let response = create_budget_endpoint(
            State(state.clone()),
            Extension(UserID::new(1)),
            Ok(Json(food_form())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body["message"], "Budget for Food in 3/2025 already exists");
        let count: i64 = state
            .db_connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM budget", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let state = get_test_state();
        let form = BudgetForm {
            month: None,
            ..food_form()
        };

        let response =
            create_budget_endpoint(State(state), Extension(UserID::new(1)), Ok(Json(form))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(
            body["message"],
            "Category, budget amount, month, and year are required"
        );
    }

    #[tokio::test]
    async fn blank_category_is_rejected() {
        let state = get_test_state();
        let form = BudgetForm {
            category: Some("   ".to_owned()),
            ..food_form()
        };

        let response =
            create_budget_endpoint(State(state), Extension(UserID::new(1)), Ok(Json(form))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let state = get_test_state();
        let form = BudgetForm {
            budget_amount: Some(-5.0),
            ..food_form()
        };

        let response =
            create_budget_endpoint(State(state), Extension(UserID::new(1)), Ok(Json(form))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn month_out_of_range_is_rejected() {
        let state = get_test_state();
        let form = BudgetForm {
            month: Some(13),
            ..food_form()
        };

        let response =
            create_budget_endpoint(State(state), Extension(UserID::new(1)), Ok(Json(form))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn category_is_trimmed() {
        let state = get_test_state();
        let form = BudgetForm {
            category: Some("  Food ".to_owned()),
            ..food_form()
        };

        let response =
            create_budget_endpoint(State(state), Extension(UserID::new(1)), Ok(Json(form))).await;

        let body = parse_json_body(response).await;
        assert_eq!(body["category"], "Food");
    }
}
