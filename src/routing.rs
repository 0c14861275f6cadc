//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use crate::{
    AppState,
    budget::{
        create_budget_endpoint, delete_budget_endpoint, edit_budget_endpoint,
        get_budget_summary_endpoint, list_budgets_endpoint,
    },
    dashboard::get_dashboard_endpoint,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, download_expenses_endpoint,
        list_expenses_endpoint,
    },
    health::get_ping,
    income::{
        create_income_endpoint, delete_income_endpoint, download_incomes_endpoint,
        list_incomes_endpoint,
    },
    not_found::get_404_not_found,
    owner::owner_guard,
};

/// Return a router with all the app's routes.
///
/// Every route under `/api/v1` requires the owner header, see [crate::OWNER_HEADER].
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(endpoints::PING, get(get_ping));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(endpoints::BUDGET_SUMMARY, get(get_budget_summary_endpoint))
        .route(
            endpoints::BUDGET,
            put(edit_budget_endpoint).delete(delete_budget_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSE, delete(delete_expense_endpoint))
        .route(endpoints::EXPENSE_DOWNLOAD, get(download_expenses_endpoint))
        .route(
            endpoints::INCOMES,
            get(list_incomes_endpoint).post(create_income_endpoint),
        )
        .route(endpoints::INCOME, delete(delete_income_endpoint))
        .route(endpoints::INCOME_DOWNLOAD, get(download_incomes_endpoint))
        .layer(middleware::from_fn(owner_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, OWNER_HEADER,
        endpoints::{self, format_endpoint},
        timezone::get_local_date,
    };

    use super::build_router;

    const TIMEZONE: &str = "Etc/UTC";

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(connection, TIMEZONE).expect("Could not create app state.");

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn ping_does_not_need_owner() {
        let server = get_test_server();

        let response = server.get(endpoints::PING).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "OK");
    }

    #[tokio::test]
    async fn api_requires_owner() {
        let server = get_test_server();

        let response = server.get(endpoints::BUDGETS).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/v2/nothing").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "message": "Not found" }));
    }

    #[tokio::test]
    async fn budget_tracks_expenses_through_the_api() {
        let server = get_test_server();
        let today = get_local_date(TIMEZONE).unwrap();
        let (month, year) = (today.month() as u8, today.year());

        server
            .post(endpoints::EXPENSES)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "category": "Food", "amount": 850.0, "date": today.to_string() }))
            .await
            .assert_status_ok();

        let response = server
            .post(endpoints::BUDGETS)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "category": "Food", "budgetAmount": 1000.0, "month": month, "year": year }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let budget = response.json::<Value>();
        assert_eq!(budget["spentAmount"], 850.0);
        assert_eq!(budget["status"], "warning");
        let budget_id = budget["id"].as_i64().expect("budget ID should be an integer");

        server
            .post(endpoints::EXPENSES)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "category": "Food", "amount": 350.0, "date": today.to_string() }))
            .await
            .assert_status_ok();

        let summary = server
            .get(endpoints::BUDGET_SUMMARY)
            .add_header(OWNER_HEADER, "1")
            .await
            .json::<Value>();
        assert_eq!(summary["totalBudgets"], 1);
        assert_eq!(summary["totalSpent"], 1200.0);
        assert_eq!(summary["totalRemaining"], -200.0);
        assert_eq!(summary["budgetsByStatus"]["exceeded"], 1);
        assert_eq!(summary["budgets"][0]["utilizationPercentage"], 100.0);

        server
            .put(&format_endpoint(endpoints::BUDGET, budget_id))
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "budgetAmount": 2400.0 }))
            .await
            .assert_json_contains(&json!({ "utilizationPercentage": 50.0, "status": "moderate" }));

        server
            .delete(&format_endpoint(endpoints::BUDGET, budget_id))
            .add_header(OWNER_HEADER, "1")
            .await
            .assert_json(&json!({ "message": "Budget deleted successfully" }));

        let budgets = server
            .get(endpoints::BUDGETS)
            .add_header(OWNER_HEADER, "1")
            .await
            .json::<Value>();
        assert_eq!(budgets, json!([]));
    }

    #[tokio::test]
    async fn duplicate_budget_is_rejected() {
        let server = get_test_server();
        let body = json!({ "category": "Rent", "budgetAmount": 500.0, "month": 2, "year": 2025 });

        server
            .post(endpoints::BUDGETS)
            .add_header(OWNER_HEADER, "3")
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);
        let response = server
            .post(endpoints::BUDGETS)
            .add_header(OWNER_HEADER, "3")
            .json(&body)
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "message": "Budget for Rent in 2/2025 already exists" }));
    }

    #[tokio::test]
    async fn budgets_are_scoped_to_owner() {
        let server = get_test_server();
        let response = server
            .post(endpoints::BUDGETS)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "category": "Fun", "budgetAmount": 50.0, "month": 6, "year": 2025 }))
            .await;
        let budget_id = response.json::<Value>()["id"].as_i64().unwrap();

        server
            .delete(&format_endpoint(endpoints::BUDGET, budget_id))
            .add_header(OWNER_HEADER, "2")
            .await
            .assert_status_not_found();

        let budgets = server
            .get(endpoints::BUDGETS)
            .add_query_params(json!({ "month": 6, "year": 2025 }))
            .add_header(OWNER_HEADER, "1")
            .await
            .json::<Value>();
        assert_eq!(budgets[0]["id"], budget_id);
    }

    #[tokio::test]
    async fn expense_download_is_csv() {
        let server = get_test_server();
        server
            .post(endpoints::EXPENSES)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "category": "Books", "amount": 20.0, "date": "2025-05-04" }))
            .await
            .assert_status_ok();

        let response = server
            .get(endpoints::EXPENSE_DOWNLOAD)
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        response.assert_text("Category,Amount,Date\nBooks,20.0,2025-05-04\n");
    }

    #[tokio::test]
    async fn empty_period_query_lists_current_month() {
        let server = get_test_server();
        let today = get_local_date(TIMEZONE).unwrap();
        server
            .post(endpoints::BUDGETS)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({
                "category": "Food",
                "budgetAmount": 100.0,
                "month": today.month() as u8,
                "year": today.year(),
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(&format!("{}?month=&year=", endpoints::BUDGETS))
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        let budgets = response.json::<Value>();
        assert_eq!(budgets.as_array().map(Vec::len), Some(1));
        assert_eq!(budgets[0]["category"], "Food");
    }

    #[tokio::test]
    async fn non_numeric_month_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .get(&format!("{}?month=abc", endpoints::BUDGETS))
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["message"].is_string());
    }

    #[tokio::test]
    async fn non_numeric_ids_are_json_bad_request() {
        let server = get_test_server();

        let edit = server
            .put("/api/v1/budget/abc")
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "budgetAmount": 10.0 }))
            .await;
        let delete_budget = server
            .delete("/api/v1/budget/abc")
            .add_header(OWNER_HEADER, "1")
            .await;
        let delete_expense = server
            .delete("/api/v1/expense/abc")
            .add_header(OWNER_HEADER, "1")
            .await;
        let delete_income = server
            .delete("/api/v1/income/abc")
            .add_header(OWNER_HEADER, "1")
            .await;

        for response in [edit, delete_budget, delete_expense, delete_income] {
            response.assert_status_bad_request();
            assert!(response.json::<Value>()["message"].is_string());
        }
    }

    #[tokio::test]
    async fn dashboard_combines_income_and_expenses() {
        let server = get_test_server();
        let today = get_local_date(TIMEZONE).unwrap().to_string();
        server
            .post(endpoints::INCOMES)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "source": "Salary", "amount": 500.0, "date": today }))
            .await
            .assert_status_ok();
        server
            .post(endpoints::EXPENSES)
            .add_header(OWNER_HEADER, "1")
            .json(&json!({ "category": "Food", "amount": 120.0, "date": today }))
            .await
            .assert_status_ok();

        let response = server
            .get(endpoints::DASHBOARD)
            .add_header(OWNER_HEADER, "1")
            .await;

        response.assert_status_ok();
        response.assert_json_contains(&json!({
            "totalBalance": 380.0,
            "totalIncome": 500.0,
            "totalExpense": 120.0,
            "last30DaysExpenses": { "total": 120.0 },
            "last60DaysIncome": { "total": 500.0 },
        }));
        assert_eq!(
            response.json::<Value>()["recentTransactions"]
                .as_array()
                .map(Vec::len),
            Some(2)
        );
    }
}
