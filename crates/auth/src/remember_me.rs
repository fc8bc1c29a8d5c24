use crate::{AuthResponse, PostAuthenticationGuardToken, RequestView};

/// Extension point for long-lived logins.
///
/// The firewall only calls these for guards configured with `remember_me` whose
/// authenticator reports `supports_remember_me() == true`. Persisting the
/// remember-me credential is entirely up to the implementation.
pub trait RememberMeServices: Send + Sync {
    /// Called after a successful login.
    ///
    /// `response` is `None` when the authenticator let the request continue, in
    /// which case there is nothing to attach a credential to.
    fn login_success(
        &self,
        request: &RequestView,
        response: Option<&mut AuthResponse>,
        token: &PostAuthenticationGuardToken,
    );

    /// Called after a rejected login; implementations usually drop any
    /// remember-me credential the client still holds.
    fn login_fail(&self, request: &RequestView);
}
