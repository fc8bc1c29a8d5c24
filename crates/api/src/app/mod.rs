//! HTTP API application wiring (Axum router + firewall wiring).
//!
//! - `routes.rs`: HTTP handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;

use tokenguard_auth::{DefaultUserChecker, InteractiveLoginEvent, UserProvider};
use tokenguard_events::{Event, EventBus, InMemoryEventBus, Subscription};

use crate::config::{ConfigError, SecurityConfig};
use crate::middleware;
use crate::wiring::{AuthenticatorRegistry, FirewallMap, FirewallServices};

pub mod errors;
pub mod routes;

/// Build the full HTTP router with the built-in authenticators.
pub fn build_app(
    config: &SecurityConfig,
    users: Arc<dyn UserProvider>,
) -> Result<Router, ConfigError> {
    build_app_with(config, users, AuthenticatorRegistry::with_defaults())
}

/// Build the router with a caller-supplied authenticator registry.
pub fn build_app_with(
    config: &SecurityConfig,
    users: Arc<dyn UserProvider>,
    registry: AuthenticatorRegistry,
) -> Result<Router, ConfigError> {
    let bus: Arc<InMemoryEventBus<InteractiveLoginEvent>> = Arc::new(InMemoryEventBus::new());
    spawn_login_audit(bus.subscribe());

    let services = FirewallServices {
        user_provider: users,
        user_checker: Arc::new(DefaultUserChecker::new()),
        events: Some(bus),
        remember_me: None,
    };
    let firewalls = FirewallMap::build(config, &registry, &services)?;

    let state = middleware::FirewallState {
        firewalls: Arc::new(firewalls),
    };

    Ok(Router::new()
        .route("/health", get(routes::health))
        .route("/api/me", get(routes::me))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::firewall_middleware,
        ))
        .layer(ServiceBuilder::new()))
}

/// Log every interactive login on a background thread.
///
/// The thread ends when the bus (owned by the router) is dropped.
fn spawn_login_audit(subscription: Subscription<InteractiveLoginEvent>) {
    let spawned = std::thread::Builder::new()
        .name("login-audit".to_string())
        .spawn(move || {
            while let Ok(event) = subscription.recv() {
                tracing::info!(
                    event_type = event.event_type(),
                    occurred_at = %event.occurred_at(),
                    firewall = %event.token.firewall(),
                    user = event.token.username(),
                    path = event.request.path(),
                    "interactive login"
                );
            }
        });

    if let Err(e) = spawned {
        tracing::warn!(error = %e, "login audit disabled; failed to spawn thread");
    }
}
