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
    income::db::{IncomeId, delete_income},
};

/// The state needed to delete income.
#[derive(Debug, Clone)]
pub struct DeleteIncomeState {
    /// The database connection for managing income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the owner's income records.
pub async fn delete_income_endpoint(
    State(state): State<DeleteIncomeState>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<IncomeId>, PathRejection>,
) -> Response {
    let income_id = match path {
        Ok(Path(income_id)) => income_id,
        Err(rejection) => return Error::InvalidField(rejection.body_text()).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_income(income_id, user_id, &connection) {
        Ok(()) => Json(json!({ "message": "Income deleted successfully" })).into_response(),
        Err(error) => error.into_response(),
    }
}
