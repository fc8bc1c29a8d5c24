//! Account checks run around every guard authentication.

use chrono::{DateTime, Utc};

use tokenguard_core::AuthenticationError;

use crate::{User, UserStatus};

/// Pre/post authentication checks on a resolved user.
///
/// - `check_pre_auth` runs right after the user was resolved (account state).
/// - `check_post_auth` runs after the authenticated token was built
///   (credential state).
pub trait UserChecker: Send + Sync {
    fn check_pre_auth(&self, user: &User) -> Result<(), AuthenticationError>;

    fn check_post_auth(&self, user: &User) -> Result<(), AuthenticationError>;
}

/// Status-based checks plus credential expiry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUserChecker {
    fixed_now: Option<DateTime<Utc>>,
}

impl DefaultUserChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate expiry against a fixed instant instead of the wall clock.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { fixed_now: Some(now) }
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

impl UserChecker for DefaultUserChecker {
    fn check_pre_auth(&self, user: &User) -> Result<(), AuthenticationError> {
        match user.status {
            UserStatus::Active => Ok(()),
            UserStatus::Locked => Err(AuthenticationError::AccountLocked),
            UserStatus::Disabled => Err(AuthenticationError::AccountDisabled),
            UserStatus::Expired => Err(AuthenticationError::AccountExpired),
        }
    }

    fn check_post_auth(&self, user: &User) -> Result<(), AuthenticationError> {
        match user.credentials_expire_at {
            Some(at) if at <= self.now() => Err(AuthenticationError::CredentialsExpired),
            _ => Ok(()),
        }
    }
}
