//! Test doubles shared by the unit tests of this crate.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokenguard_core::{AuthenticationError, FirewallName};

use crate::{
    AuthResponse, AuthenticationEntryPoint, Credentials, GuardAuthenticator,
    PostAuthenticationGuardToken, RememberMeServices, RequestView, User, UserProvider,
};

/// Configurable authenticator that counts how often it is asked for a user.
///
/// Reads its token from the `x-<name>-token` header.
pub(crate) struct RecordingAuthenticator {
    name: String,
    header: String,
    get_user_calls: AtomicUsize,
    fixed_user: Option<User>,
    success_response: Option<AuthResponse>,
    failure_response: Option<AuthResponse>,
    remember_me: bool,
}

impl RecordingAuthenticator {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: format!("x-{name}-token"),
            get_user_calls: AtomicUsize::new(0),
            fixed_user: None,
            success_response: None,
            failure_response: None,
            remember_me: false,
        }
    }

    pub(crate) fn header(&self) -> &str {
        &self.header
    }

    pub(crate) fn returning_user(mut self, user: User) -> Self {
        self.fixed_user = Some(user);
        self
    }

    pub(crate) fn responding_on_success(mut self, response: AuthResponse) -> Self {
        self.success_response = Some(response);
        self
    }

    pub(crate) fn responding_on_failure(mut self, response: AuthResponse) -> Self {
        self.failure_response = Some(response);
        self
    }

    pub(crate) fn supporting_remember_me(mut self) -> Self {
        self.remember_me = true;
        self
    }

    pub(crate) fn get_user_calls(&self) -> usize {
        self.get_user_calls.load(Ordering::SeqCst)
    }
}

impl AuthenticationEntryPoint for RecordingAuthenticator {
    fn start(&self, _request: &RequestView, error: Option<&AuthenticationError>) -> AuthResponse {
        let message = match error {
            Some(e) => format!("{} challenge: {}", self.name, e.message_key()),
            None => format!("{} challenge", self.name),
        };
        AuthResponse::message(401, message)
    }
}

impl GuardAuthenticator for RecordingAuthenticator {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_credentials(&self, request: &RequestView) -> Option<Credentials> {
        request
            .header(&self.header)
            .map(|token| Credentials::new().with("token", token))
    }

    fn get_user(
        &self,
        credentials: &Credentials,
        user_provider: &dyn UserProvider,
    ) -> Result<User, AuthenticationError> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(user) = &self.fixed_user {
            return Ok(user.clone());
        }
        let token = credentials
            .get("token")
            .ok_or_else(|| AuthenticationError::invalid_credentials("no token"))?;
        user_provider
            .load_user_by_token(token)
            .ok_or(AuthenticationError::UserNotFound)
    }

    fn on_authentication_success(
        &self,
        _request: &RequestView,
        _token: &PostAuthenticationGuardToken,
        _firewall: &FirewallName,
    ) -> Option<AuthResponse> {
        self.success_response.clone()
    }

    fn on_authentication_failure(
        &self,
        _request: &RequestView,
        _error: &AuthenticationError,
    ) -> Option<AuthResponse> {
        self.failure_response.clone()
    }

    fn supports_remember_me(&self) -> bool {
        self.remember_me
    }
}

/// Remember-me services that record what they were told.
#[derive(Default)]
pub(crate) struct RecordingRememberMe {
    pub(crate) successes: Mutex<Vec<String>>,
    pub(crate) failures: AtomicUsize,
}

impl RememberMeServices for RecordingRememberMe {
    fn login_success(
        &self,
        _request: &RequestView,
        response: Option<&mut AuthResponse>,
        token: &PostAuthenticationGuardToken,
    ) {
        if let Some(response) = response {
            response.add_header("Set-Cookie", "REMEMBERME=1");
        }
        if let Ok(mut successes) = self.successes.lock() {
            successes.push(token.username().to_string());
        }
    }

    fn login_fail(&self, _request: &RequestView) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}
