//! Header token authenticator (`X-AUTH-TOKEN: <token>`).

use tokenguard_core::{AuthenticationError, FirewallName};

use crate::{
    AuthResponse, AuthenticationEntryPoint, Credentials, GuardAuthenticator,
    PostAuthenticationGuardToken, RequestView, User, UserProvider,
};

pub const DEFAULT_TOKEN_HEADER: &str = "X-AUTH-TOKEN";

const TOKEN_KEY: &str = "token";

/// Authenticates requests carrying an API token in a header.
///
/// - No header (or a blank one): not applicable, the request is left alone.
/// - Unknown token: 403 with the failure's message key.
/// - Success: the request continues untouched.
/// - Challenge: 401 `{"message": "Authentication Required"}`.
#[derive(Debug, Clone)]
pub struct HeaderTokenAuthenticator {
    header: String,
}

impl HeaderTokenAuthenticator {
    pub fn new() -> Self {
        Self::with_header(DEFAULT_TOKEN_HEADER)
    }

    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }
}

impl Default for HeaderTokenAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthenticationEntryPoint for HeaderTokenAuthenticator {
    fn start(&self, _request: &RequestView, _error: Option<&AuthenticationError>) -> AuthResponse {
        AuthResponse::message(401, "Authentication Required")
    }
}

impl GuardAuthenticator for HeaderTokenAuthenticator {
    fn name(&self) -> &str {
        "HeaderTokenAuthenticator"
    }

    fn get_credentials(&self, request: &RequestView) -> Option<Credentials> {
        let token = request.header(&self.header)?.trim();
        if token.is_empty() {
            return None;
        }

        Some(Credentials::new().with(TOKEN_KEY, token))
    }

    fn get_user(
        &self,
        credentials: &Credentials,
        user_provider: &dyn UserProvider,
    ) -> Result<User, AuthenticationError> {
        let token = credentials
            .get(TOKEN_KEY)
            .ok_or_else(|| AuthenticationError::invalid_credentials("missing token"))?;

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
        None
    }

    fn on_authentication_failure(
        &self,
        _request: &RequestView,
        error: &AuthenticationError,
    ) -> Option<AuthResponse> {
        Some(AuthResponse::message(403, error.message_key()))
    }

    fn supports_remember_me(&self) -> bool {
        false
    }
}
