//! Defines the endpoint for changing a budget's spending limit.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserID,
    budget::{BudgetId, db::update_budget_amount},
};

/// The state needed to edit a budget.
#[derive(Debug, Clone)]
pub struct EditBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for editing a budget. Only the amount can be changed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBudgetForm {
    /// The new spending limit.
    pub budget_amount: Option<f64>,
}

/// A route handler for updating the amount of an active budget, responds with the updated
/// budget.
pub async fn edit_budget_endpoint(
    State(state): State<EditBudgetState>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<BudgetId>, PathRejection>,
    payload: Result<Json<EditBudgetForm>, JsonRejection>,
) -> Response {
    let budget_id = match path {
        Ok(Path(budget_id)) => budget_id,
        Err(rejection) => return Error::InvalidField(rejection.body_text()).into_response(),
    };

    let budget_amount = match payload {
        Ok(Json(EditBudgetForm {
            budget_amount: Some(amount),
        })) => amount,
        Ok(Json(EditBudgetForm {
            budget_amount: None,
        })) => {
            return Error::MissingFields("Budget amount is required".to_owned()).into_response();
        }
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    if budget_amount < 0.0 || !budget_amount.is_finite() {
        return Error::InvalidField("Budget amount must be zero or more".to_owned())
            .into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_budget_amount(budget_id, user_id, budget_amount, &connection) {
        Ok(budget) => Json(budget).into_response(),
        Err(Error::UpdateMissingBudget) => Error::UpdateMissingBudget.into_response(),
        Err(error) => {
            tracing::error!("Could not update budget {budget_id}: {error}");
            error.into_response()
        }
    }
}
