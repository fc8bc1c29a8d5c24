//! The guard authenticator contract.
//!
//! A guard authenticator owns one way of logging a user in (a header token,
//! a login form, an API key...). The firewall drives it through a fixed
//! sequence:
//!
//! ```text
//! get_credentials ──None──▶ skip (request continues, or challenge via start)
//!       │
//!       ▼ Some
//! get_user ──Err──▶ on_authentication_failure
//!       │
//!       ▼ Ok
//! create_authenticated_token ──▶ on_authentication_success
//! ```
//!
//! Hooks returning `None` mean "let the original request continue".

use std::sync::Arc;

use tokenguard_core::{AuthenticationError, FirewallName};

use crate::{
    AuthResponse, Credentials, PostAuthenticationGuardToken, RequestView, User, UserProvider,
};

/// Starts authentication when a protected zone is hit without credentials.
pub trait AuthenticationEntryPoint: Send + Sync {
    /// Build the challenge response.
    ///
    /// `error` is set when the challenge follows a rejected login.
    fn start(&self, request: &RequestView, error: Option<&AuthenticationError>) -> AuthResponse;
}

pub trait GuardAuthenticator: AuthenticationEntryPoint {
    /// Human-readable name used in logs and contract-violation errors.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Pull credentials out of the request, or `None` if this authenticator
    /// does not apply to it.
    fn get_credentials(&self, request: &RequestView) -> Option<Credentials>;

    /// Resolve credentials to a user.
    fn get_user(
        &self,
        credentials: &Credentials,
        user_provider: &dyn UserProvider,
    ) -> Result<User, AuthenticationError>;

    fn create_authenticated_token(
        &self,
        user: User,
        firewall: &FirewallName,
    ) -> PostAuthenticationGuardToken {
        let roles = user.roles.clone();
        PostAuthenticationGuardToken::new(user, firewall.clone(), roles)
    }

    fn on_authentication_success(
        &self,
        request: &RequestView,
        token: &PostAuthenticationGuardToken,
        firewall: &FirewallName,
    ) -> Option<AuthResponse>;

    fn on_authentication_failure(
        &self,
        request: &RequestView,
        error: &AuthenticationError,
    ) -> Option<AuthResponse>;

    /// Whether remember-me may be enabled for this authenticator.
    fn supports_remember_me(&self) -> bool;
}

/// Shared handle to a registered authenticator.
pub type SharedAuthenticator = Arc<dyn GuardAuthenticator>;

/// Uses an authenticator's own `start` as a firewall entry point.
#[derive(Clone)]
pub struct AuthenticatorEntryPoint(pub SharedAuthenticator);

impl AuthenticationEntryPoint for AuthenticatorEntryPoint {
    fn start(&self, request: &RequestView, error: Option<&AuthenticationError>) -> AuthResponse {
        self.0.start(request, error)
    }
}

impl core::fmt::Debug for AuthenticatorEntryPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("AuthenticatorEntryPoint")
            .field(&self.0.name())
            .finish()
    }
}
