//! Per-request driver of the guard protocol for one protected zone.
//!
//! ## Request flow
//!
//! ```text
//! for each registered authenticator (registration order):
//!     get_credentials(request)
//!       None  → try the next one
//!       Some  → candidate token → provider.authenticate
//!                 Ok  → handler persists token → on_authentication_success
//!                 Err → handler clears token  → on_authentication_failure
//!               the first authenticator that applied decides the request
//! nobody applied and the zone is not anonymous → entry point start(request, None)
//! ```
//!
//! User-facing failures never leave this module as errors; they become
//! responses (or a challenge). Only defects propagate as `Err`.

use std::sync::Arc;

use tokenguard_core::{AuthenticationError, FirewallName, GuardError, GuardResult};

use crate::handler::ensure_valid;
use crate::{
    AuthResponse, AuthenticationEntryPoint, GuardAuthenticationProvider, GuardAuthenticator,
    GuardAuthenticatorHandler, NonAuthenticatedGuardToken, PostAuthenticationGuardToken,
    RegisteredAuthenticator, RememberMeServices, RequestView, TokenStorage,
};

const REMEMBER_ME_SUCCESS: &str = "login_success";

/// What the transport should do with the request.
#[derive(Debug, Clone, PartialEq)]
pub enum FirewallOutcome {
    /// Let the original request through (authenticated or not; see the storage).
    Continue,
    /// Short-circuit with this response.
    Respond(AuthResponse),
}

pub struct GuardFirewall {
    provider: GuardAuthenticationProvider,
    handler: GuardAuthenticatorHandler,
    entry_point: Arc<dyn AuthenticationEntryPoint>,
    anonymous: bool,
    remember_me: Option<Arc<dyn RememberMeServices>>,
}

impl GuardFirewall {
    pub fn new(
        provider: GuardAuthenticationProvider,
        handler: GuardAuthenticatorHandler,
        entry_point: Arc<dyn AuthenticationEntryPoint>,
    ) -> Self {
        Self {
            provider,
            handler,
            entry_point,
            anonymous: false,
            remember_me: None,
        }
    }

    /// Let unauthenticated requests through instead of challenging them.
    pub fn allow_anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    pub fn with_remember_me(mut self, services: Arc<dyn RememberMeServices>) -> Self {
        self.remember_me = Some(services);
        self
    }

    pub fn name(&self) -> &FirewallName {
        self.provider.firewall()
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Run the guard protocol for one request.
    pub fn handle(
        &self,
        request: &RequestView,
        storage: &mut TokenStorage,
    ) -> GuardResult<FirewallOutcome> {
        for entry in self.provider.authenticators().iter() {
            let Some(credentials) = entry.authenticator().get_credentials(request) else {
                continue;
            };

            let token = NonAuthenticatedGuardToken::new(credentials, entry.key().clone());
            return match self.provider.authenticate(&token) {
                Ok(authenticated) => self.on_success(entry, request, storage, authenticated),
                Err(GuardError::Authentication(error)) => {
                    self.on_failure(entry, request, storage, error)
                }
                Err(fatal) => Err(fatal),
            };
        }

        if self.anonymous || storage.is_authenticated() {
            return Ok(FirewallOutcome::Continue);
        }

        tracing::debug!(firewall = %self.name(), path = request.path(), "no credentials; starting authentication");
        self.challenge(request, None)
    }

    fn on_success(
        &self,
        entry: &RegisteredAuthenticator,
        request: &RequestView,
        storage: &mut TokenStorage,
        authenticated: PostAuthenticationGuardToken,
    ) -> GuardResult<FirewallOutcome> {
        let authenticator: &dyn GuardAuthenticator = entry.authenticator().as_ref();

        self.handler
            .authenticate_with_token(storage, authenticated.clone(), request);
        let mut response = self.handler.handle_authentication_success(
            &authenticated,
            request,
            authenticator,
            self.name(),
        )?;

        if let Some(services) = self.remember_me_for(entry) {
            services.login_success(request, response.as_mut(), &authenticated);
            // The services may have edited the response; it must still be sendable.
            response = ensure_valid(authenticator, REMEMBER_ME_SUCCESS, response)?;
        }

        Ok(match response {
            Some(response) => FirewallOutcome::Respond(response),
            None => FirewallOutcome::Continue,
        })
    }

    fn on_failure(
        &self,
        entry: &RegisteredAuthenticator,
        request: &RequestView,
        storage: &mut TokenStorage,
        error: AuthenticationError,
    ) -> GuardResult<FirewallOutcome> {
        let response = self.handler.handle_authentication_failure(
            storage,
            &error,
            entry.authenticator().as_ref(),
            request,
        )?;

        if let Some(services) = self.remember_me_for(entry) {
            services.login_fail(request);
        }

        match response {
            Some(response) => Ok(FirewallOutcome::Respond(response)),
            None if self.anonymous => Ok(FirewallOutcome::Continue),
            None => self.challenge(request, Some(&error)),
        }
    }

    fn challenge(
        &self,
        request: &RequestView,
        error: Option<&AuthenticationError>,
    ) -> GuardResult<FirewallOutcome> {
        let response = self.entry_point.start(request, error);
        response
            .validate()
            .map_err(|returned| GuardError::ContractViolation {
                authenticator: format!("{} entry point", self.name()),
                hook: "start",
                returned,
            })?;

        Ok(FirewallOutcome::Respond(response))
    }

    fn remember_me_for(&self, entry: &RegisteredAuthenticator) -> Option<&dyn RememberMeServices> {
        if !entry.remember_me() {
            return None;
        }
        self.remember_me.as_deref()
    }
}
