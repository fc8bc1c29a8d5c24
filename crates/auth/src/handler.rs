//! Turns authentication outcomes into stored tokens and responses.
//!
//! The handler is the only place where a successful login becomes visible to
//! the rest of the request (via [`TokenStorage`]) and to the rest of the
//! process (via the interactive-login event). It also polices the authenticator
//! hooks: whatever they return must be `None` or a response the transport can
//! send, anything else aborts with `GuardError::ContractViolation`.

use std::sync::Arc;

use tokenguard_core::{AuthenticationError, FirewallName, GuardError, GuardResult};
use tokenguard_events::EventBus;

use crate::{
    AuthResponse, GuardAuthenticator, InteractiveLoginEvent, PostAuthenticationGuardToken,
    RequestView, TokenStorage, User,
};

const ON_SUCCESS: &str = "on_authentication_success";
const ON_FAILURE: &str = "on_authentication_failure";

#[derive(Clone, Default)]
pub struct GuardAuthenticatorHandler {
    dispatcher: Option<Arc<dyn EventBus<InteractiveLoginEvent>>>,
}

impl GuardAuthenticatorHandler {
    /// `dispatcher` is optional; without one no login events are published.
    pub fn new(dispatcher: Option<Arc<dyn EventBus<InteractiveLoginEvent>>>) -> Self {
        Self { dispatcher }
    }

    /// Persist `token` for the current request and announce the login.
    ///
    /// A failed publish is logged and otherwise ignored: the user is logged in
    /// either way.
    pub fn authenticate_with_token(
        &self,
        storage: &mut TokenStorage,
        token: PostAuthenticationGuardToken,
        request: &RequestView,
    ) {
        let event = self
            .dispatcher
            .as_ref()
            .map(|bus| (bus, InteractiveLoginEvent::new(request.clone(), token.clone())));

        tracing::info!(firewall = %token.firewall(), user = token.username(), "guard login");
        storage.set_token(Some(token));

        if let Some((bus, event)) = event {
            if let Err(e) = bus.publish(event) {
                tracing::warn!(error = %e, "failed to publish interactive login event");
            }
        }
    }

    /// Ask the authenticator what to do after a successful login.
    pub fn handle_authentication_success(
        &self,
        token: &PostAuthenticationGuardToken,
        request: &RequestView,
        authenticator: &dyn GuardAuthenticator,
        firewall: &FirewallName,
    ) -> GuardResult<Option<AuthResponse>> {
        let response = authenticator.on_authentication_success(request, token, firewall);
        ensure_valid(authenticator, ON_SUCCESS, response)
    }

    /// Build, persist and answer for a user the caller already resolved.
    ///
    /// For authenticators that log users in out of band (e.g. right after
    /// registration) without going through the dispatch provider.
    pub fn authenticate_user_and_handle_success(
        &self,
        storage: &mut TokenStorage,
        user: User,
        request: &RequestView,
        authenticator: &dyn GuardAuthenticator,
        firewall: &FirewallName,
    ) -> GuardResult<Option<AuthResponse>> {
        let token = authenticator.create_authenticated_token(user, firewall);
        self.authenticate_with_token(storage, token.clone(), request);

        self.handle_authentication_success(&token, request, authenticator, firewall)
    }

    /// Forget any token for this request and ask the authenticator for a
    /// failure response.
    pub fn handle_authentication_failure(
        &self,
        storage: &mut TokenStorage,
        error: &AuthenticationError,
        authenticator: &dyn GuardAuthenticator,
        request: &RequestView,
    ) -> GuardResult<Option<AuthResponse>> {
        storage.clear();
        tracing::warn!(authenticator = authenticator.name(), reason = %error, "guard authentication failed");

        let response = authenticator.on_authentication_failure(request, error);
        ensure_valid(authenticator, ON_FAILURE, response)
    }
}

impl core::fmt::Debug for GuardAuthenticatorHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GuardAuthenticatorHandler")
            .field("dispatcher", &self.dispatcher.is_some())
            .finish()
    }
}

/// `None` and transport-valid responses pass; anything else is a defect in
/// the authenticator.
pub(crate) fn ensure_valid(
    authenticator: &dyn GuardAuthenticator,
    hook: &'static str,
    response: Option<AuthResponse>,
) -> GuardResult<Option<AuthResponse>> {
    let Some(response) = response else {
        return Ok(None);
    };

    match response.validate() {
        Ok(()) => Ok(Some(response)),
        Err(returned) => Err(GuardError::ContractViolation {
            authenticator: authenticator.name().to_string(),
            hook,
            returned,
        }),
    }
}
