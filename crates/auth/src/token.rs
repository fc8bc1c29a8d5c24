//! Security tokens before and after guard authentication.

use chrono::{DateTime, Utc};

use tokenguard_core::{FirewallName, ProviderKey, TokenError};

use crate::{Credentials, Role, User};

/// The token used by the guard system before authentication.
///
/// The firewall creates one per successful credential extraction and hands it
/// straight to the dispatch provider. If authentication succeeds, a different
/// token ([`PostAuthenticationGuardToken`]) is returned; this one is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonAuthenticatedGuardToken {
    credentials: Credentials,
    guard_provider_key: ProviderKey,
}

impl NonAuthenticatedGuardToken {
    /// `guard_provider_key` binds this token to exactly one registered authenticator.
    pub fn new(credentials: Credentials, guard_provider_key: ProviderKey) -> Self {
        Self {
            credentials,
            guard_provider_key,
        }
    }

    pub fn guard_provider_key(&self) -> &ProviderKey {
        &self.guard_provider_key
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_authenticated(&self) -> bool {
        false
    }

    /// Always fails: this token can never become authenticated.
    pub fn set_authenticated(&mut self, _authenticated: bool) -> Result<(), TokenError> {
        Err(TokenError::AlwaysUnauthenticated)
    }
}

/// Token produced by an authenticator once the user is known.
///
/// This is what lands in [`TokenStorage`](crate::TokenStorage) and what
/// downstream authorization reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAuthenticationGuardToken {
    user: User,
    firewall: FirewallName,
    roles: Vec<Role>,
    authenticated_at: DateTime<Utc>,
}

impl PostAuthenticationGuardToken {
    pub fn new(user: User, firewall: FirewallName, roles: Vec<Role>) -> Self {
        Self {
            user,
            firewall,
            roles,
            authenticated_at: Utc::now(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Firewall (provider key) the user authenticated against.
    pub fn firewall(&self) -> &FirewallName {
        &self.firewall
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }

    pub fn is_authenticated(&self) -> bool {
        true
    }

    pub fn into_user(self) -> User {
        self.user
    }
}
