use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use tokenguard_auth::{AuthResponse, FirewallOutcome, RequestView, TokenStorage};

use crate::app::errors::json_error;
use crate::context::AuthenticatedUser;
use crate::wiring::FirewallMap;

#[derive(Clone)]
pub struct FirewallState {
    pub firewalls: Arc<FirewallMap>,
}

/// Run the firewall covering the request path, if any.
///
/// - `Continue`: the request proceeds, with [`AuthenticatedUser`] attached when
///   a token was stored.
/// - `Respond`: the authenticator's (or entry point's) response is returned as is.
/// - fatal guard errors become a 500; they indicate broken wiring, not bad input.
pub async fn firewall_middleware(
    State(state): State<FirewallState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(firewall) = state.firewalls.firewall_for(req.uri().path()) else {
        return next.run(req).await;
    };

    let view = request_view(&req);
    let mut storage = TokenStorage::new();

    match firewall.handle(&view, &mut storage) {
        Ok(FirewallOutcome::Continue) => {
            if let Some(token) = storage.take() {
                req.extensions_mut().insert(AuthenticatedUser::from_token(&token));
            }
            next.run(req).await
        }
        Ok(FirewallOutcome::Respond(response)) => into_http_response(response),
        Err(e) => {
            tracing::error!(firewall = %firewall.name(), path = view.path(), error = %e, "guard authentication aborted");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "authentication_error",
                "authentication could not be completed",
            )
        }
    }
}

fn request_view(req: &Request<Body>) -> RequestView {
    let mut view = RequestView::new(req.method().as_str(), req.uri().path());
    for (name, value) in req.headers() {
        // Non-ASCII header values cannot carry tokens; skip them.
        if let Ok(value) = value.to_str() {
            view.insert_header(name.as_str(), value);
        }
    }
    view
}

/// Convert a validated [`AuthResponse`] into an HTTP response.
pub fn into_http_response(response: AuthResponse) -> Response {
    let Ok(status) = StatusCode::from_u16(response.status()) else {
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid_response", "invalid status code");
    };

    let mut http = (status, axum::Json(response.body().clone())).into_response();
    for (name, value) in response.headers() {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                http.headers_mut().append(name, value);
            }
            _ => tracing::warn!(header = %name, "dropping unrepresentable response header"),
        }
    }
    http
}
