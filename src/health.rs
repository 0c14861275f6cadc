//! The unauthenticated health check.

use axum::{Json, response::IntoResponse};
use serde_json::json;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Report that the server is up along with the server's current UTC time.
pub async fn get_ping() -> impl IntoResponse {
    let time = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({ "status": "OK", "time": time }))
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    use crate::test_utils::{assert_status_ok, parse_json_body};

    use super::get_ping;

    #[tokio::test]
    async fn ping_reports_ok_and_time() {
        let response = get_ping().await.into_response();

        assert_status_ok(&response);
        let body = parse_json_body(response).await;
        assert_eq!(body["status"], "OK");
        let time = body["time"].as_str().expect("time should be a string");
        assert!(OffsetDateTime::parse(time, &Rfc3339).is_ok());
    }
}
