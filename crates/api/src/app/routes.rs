use axum::{http::StatusCode, response::IntoResponse, Extension, Json};

use crate::app::errors::json_error;
use crate::context::AuthenticatedUser;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The identity the firewall resolved for this request.
///
/// Anonymous zones let unauthenticated requests reach this handler, so the
/// extension is optional.
pub async fn me(user: Option<Extension<AuthenticatedUser>>) -> axum::response::Response {
    match user {
        Some(Extension(user)) => Json(user).into_response(),
        None => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "not authenticated"),
    }
}
