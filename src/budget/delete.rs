//! Defines the endpoint for deleting a budget.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error, UserID,
    budget::{BudgetId, db::soft_delete_budget},
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a budget.
///
/// The budget is marked inactive rather than removed, the expenses in its category are kept.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<BudgetId>, PathRejection>,
) -> Response {
    let budget_id = match path {
        Ok(Path(budget_id)) => budget_id,
        Err(rejection) => return Error::InvalidField(rejection.body_text()).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match soft_delete_budget(budget_id, user_id, &connection) {
        Ok(()) => Json(json!({ "message": "Budget deleted successfully" })).into_response(),
        Err(Error::DeleteMissingBudget) => Error::DeleteMissingBudget.into_response(),
        Err(error) => {
            tracing::error!("Could not delete budget {budget_id}: {error}");
            error.into_response()
        }
    }
}
