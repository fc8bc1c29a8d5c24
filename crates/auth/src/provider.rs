//! Dispatch of candidate tokens to the authenticator they belong to.
//!
//! ## Dispatch, not fallback
//!
//! A candidate token carries the provider key of the authenticator that
//! extracted its credentials. The provider looks that key up and invokes that
//! authenticator only. Credentials that would happen to validate against a
//! different authenticator are never tried against it: one extraction, one
//! authenticator.
//!
//! ```text
//! NonAuthenticatedGuardToken(key)
//!   ↓ find registered authenticator with the same key  (none → fatal)
//!   ↓ get_user(credentials, user_provider)
//!   ↓ check_pre_auth(user)
//!   ↓ create_authenticated_token(user, firewall)
//!   ↓ check_post_auth(user)
//! PostAuthenticationGuardToken
//! ```

use std::sync::Arc;

use tokenguard_core::{FirewallName, GuardError, GuardResult};

use crate::{
    GuardAuthenticator, GuardAuthenticators, NonAuthenticatedGuardToken,
    PostAuthenticationGuardToken, UserChecker, UserProvider,
};

/// Authentication provider for one firewall's guard authenticators.
pub struct GuardAuthenticationProvider {
    authenticators: GuardAuthenticators,
    user_provider: Arc<dyn UserProvider>,
    user_checker: Arc<dyn UserChecker>,
}

impl GuardAuthenticationProvider {
    pub fn new(
        authenticators: GuardAuthenticators,
        user_provider: Arc<dyn UserProvider>,
        user_checker: Arc<dyn UserChecker>,
    ) -> Self {
        Self {
            authenticators,
            user_provider,
            user_checker,
        }
    }

    pub fn authenticators(&self) -> &GuardAuthenticators {
        &self.authenticators
    }

    pub fn firewall(&self) -> &FirewallName {
        self.authenticators.firewall()
    }

    /// Authenticate a candidate token with the authenticator its key names.
    ///
    /// - `NoMatchingAuthenticator` if no registered key matches (a wiring defect).
    /// - `Authentication(_)` if the user cannot be resolved or fails a check.
    pub fn authenticate(
        &self,
        token: &NonAuthenticatedGuardToken,
    ) -> GuardResult<PostAuthenticationGuardToken> {
        let key = token.guard_provider_key();

        for entry in self.authenticators.iter() {
            if entry.key() != key {
                continue;
            }
            tracing::debug!(firewall = %self.firewall(), key = %key, authenticator = entry.authenticator().name(), "dispatching guard token");
            return self.authenticate_via(entry.authenticator().as_ref(), token);
        }

        Err(GuardError::NoMatchingAuthenticator {
            provider_key: key.clone(),
            firewall: self.firewall().clone(),
        })
    }

    fn authenticate_via(
        &self,
        authenticator: &dyn GuardAuthenticator,
        token: &NonAuthenticatedGuardToken,
    ) -> GuardResult<PostAuthenticationGuardToken> {
        let user = authenticator.get_user(token.credentials(), self.user_provider.as_ref())?;

        self.user_checker.check_pre_auth(&user)?;
        let authenticated = authenticator.create_authenticated_token(user, self.firewall());
        self.user_checker.check_post_auth(authenticated.user())?;

        Ok(authenticated)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tokenguard_core::{AuthenticationError, ProviderKey};

    use super::*;
    use crate::testing::RecordingAuthenticator;
    use crate::{Credentials, DefaultUserChecker, InMemoryUserProvider, User, UserStatus};

    fn provider_with(
        authenticators: &[Arc<RecordingAuthenticator>],
        users: InMemoryUserProvider,
    ) -> GuardAuthenticationProvider {
        let mut registry = GuardAuthenticators::new(FirewallName::new("my_cool_firewall"));
        for a in authenticators {
            registry.register(a.clone(), false).unwrap();
        }
        GuardAuthenticationProvider::new(
            registry,
            Arc::new(users),
            Arc::new(DefaultUserChecker::new()),
        )
    }

    fn candidate(key: &'static str) -> NonAuthenticatedGuardToken {
        NonAuthenticatedGuardToken::new(
            Credentials::new()
                .with("username", "_weaverryan_test_user")
                .with("password", "guard_auth_ftw"),
            ProviderKey::new(key),
        )
    }

    #[test]
    fn only_the_matching_authenticator_is_invoked() {
        let user = User::new("_weaverryan_test_user");
        let a = Arc::new(RecordingAuthenticator::new("a"));
        let b = Arc::new(RecordingAuthenticator::new("b").returning_user(user.clone()));
        let c = Arc::new(RecordingAuthenticator::new("c"));
        let provider = provider_with(&[a.clone(), b.clone(), c.clone()], InMemoryUserProvider::new());

        let token = provider.authenticate(&candidate("my_cool_firewall_1")).unwrap();

        assert_eq!(a.get_user_calls(), 0);
        assert_eq!(b.get_user_calls(), 1);
        assert_eq!(c.get_user_calls(), 0);
        assert_eq!(token.user(), &user);
        assert_eq!(token.firewall().as_str(), "my_cool_firewall");
    }

    #[test]
    fn unknown_key_is_a_fatal_wiring_error() {
        let a = Arc::new(RecordingAuthenticator::new("a").returning_user(User::new("x")));
        let provider = provider_with(&[a.clone()], InMemoryUserProvider::new());

        let err = provider.authenticate(&candidate("my_cool_firewall_7")).unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(err, GuardError::NoMatchingAuthenticator { .. }));
        assert_eq!(a.get_user_calls(), 0);
    }

    #[test]
    fn missing_user_is_a_recoverable_failure() {
        let a = Arc::new(RecordingAuthenticator::new("a"));
        let provider = provider_with(&[a], InMemoryUserProvider::new());

        let token = NonAuthenticatedGuardToken::new(
            Credentials::new().with("token", "bad"),
            ProviderKey::new("my_cool_firewall_0"),
        );
        let err = provider.authenticate(&token).unwrap_err();

        assert_eq!(err.as_authentication(), Some(&AuthenticationError::UserNotFound));
        assert!(!err.is_fatal());
    }

    #[test]
    fn user_checks_run_around_token_creation() {
        let locked = Arc::new(
            RecordingAuthenticator::new("a").returning_user(User::new("l").with_status(UserStatus::Locked)),
        );
        let provider = provider_with(&[locked], InMemoryUserProvider::new());
        let err = provider.authenticate(&candidate("my_cool_firewall_0")).unwrap_err();
        assert_eq!(err.as_authentication(), Some(&AuthenticationError::AccountLocked));

        let expired = User::new("e").with_credentials_expiring_at(chrono::Utc::now() - chrono::Duration::minutes(1));
        let stale = Arc::new(RecordingAuthenticator::new("a").returning_user(expired));
        let provider = provider_with(&[stale], InMemoryUserProvider::new());
        let err = provider.authenticate(&candidate("my_cool_firewall_0")).unwrap_err();
        assert_eq!(err.as_authentication(), Some(&AuthenticationError::CredentialsExpired));
    }

    #[test]
    fn credentials_valid_elsewhere_are_not_retried() {
        // "lenient" would accept anything, but the candidate is bound to "picky".
        let picky = Arc::new(RecordingAuthenticator::new("picky"));
        let lenient = Arc::new(RecordingAuthenticator::new("lenient").returning_user(User::new("x")));
        let provider = provider_with(&[picky.clone(), lenient.clone()], InMemoryUserProvider::new());

        let token = NonAuthenticatedGuardToken::new(
            Credentials::new().with("token", "abc123"),
            ProviderKey::new("my_cool_firewall_0"),
        );
        assert!(provider.authenticate(&token).is_err());
        assert_eq!(picky.get_user_calls(), 1);
        assert_eq!(lenient.get_user_calls(), 0);
    }

    proptest! {
        #[test]
        fn dispatch_invokes_exactly_the_keyed_authenticator(n in 1usize..8, pick in 0usize..8) {
            let i = pick % n;
            let authenticators: Vec<_> = (0..n)
                .map(|idx| Arc::new(RecordingAuthenticator::new(&format!("g{idx}")).returning_user(User::new("u"))))
                .collect();
            let provider = provider_with(&authenticators, InMemoryUserProvider::new());

            let token = NonAuthenticatedGuardToken::new(
                Credentials::new(),
                ProviderKey::for_guard(&FirewallName::new("my_cool_firewall"), i),
            );
            prop_assert!(provider.authenticate(&token).is_ok());

            for (idx, a) in authenticators.iter().enumerate() {
                prop_assert_eq!(a.get_user_calls(), usize::from(idx == i));
            }
        }
    }
}
