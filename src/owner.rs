//! The owner of a record and the middleware that identifies it for each request.
//!
//! Authentication is done upstream of this service. The upstream layer is
//! expected to forward the authenticated user's ID in the [OWNER_HEADER] header.

use std::fmt::Display;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The request header that carries the authenticated user's ID.
pub const OWNER_HEADER: &str = "x-user-id";

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Middleware function that reads the owner ID from the [OWNER_HEADER] header.
///
/// The user ID is placed into the request extensions and the request executed normally if the
/// header holds an integer, otherwise a 401 response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>`
/// to receive the user ID.
pub async fn owner_guard(mut request: Request, next: Next) -> Response {
    let user_id = request
        .headers()
        .get(OWNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(UserID::new);

    let Some(user_id) = user_id else {
        tracing::warn!(
            "Rejected request to {} without a valid {OWNER_HEADER} header",
            request.uri()
        );
        return Error::MissingOwner.into_response();
    };

    request.extensions_mut().insert(user_id);

    next.run(request).await
}
