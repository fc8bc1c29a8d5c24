//! Error taxonomy of the guard layer.
//!
//! Two families live here:
//! - [`AuthenticationError`]: user-facing, recoverable. Always turned into a
//!   response at the firewall boundary.
//! - [`GuardError`]: everything the protocol itself can fail with. Most variants
//!   are defects (misconfiguration, broken authenticator) and must surface loudly.

use thiserror::Error;

use crate::{FirewallName, ProviderKey};

/// Result type used across the guard layer.
pub type GuardResult<T> = Result<T, GuardError>;

/// Recoverable authentication failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The user provider had no user for the supplied credentials.
    #[error("user not found")]
    UserNotFound,

    /// Credentials were present but rejected.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("account is disabled")]
    AccountDisabled,

    #[error("account is locked")]
    AccountLocked,

    #[error("account has expired")]
    AccountExpired,

    #[error("credentials have expired")]
    CredentialsExpired,
}

impl AuthenticationError {
    pub fn invalid_credentials(msg: impl Into<String>) -> Self {
        Self::InvalidCredentials(msg.into())
    }

    /// Stable, client-safe message key.
    ///
    /// Unlike `Display`, this never carries internal detail and is what
    /// authenticators put in failure payloads.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::UserNotFound => "Username could not be found.",
            Self::InvalidCredentials(_) => "Invalid credentials.",
            Self::AccountDisabled => "Account is disabled.",
            Self::AccountLocked => "Account is locked.",
            Self::AccountExpired => "Account has expired.",
            Self::CredentialsExpired => "Credentials have expired.",
        }
    }
}

/// Misuse of a security token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("a non-authenticated guard token is always unauthenticated")]
    AlwaysUnauthenticated,
}

/// Error raised by the guard protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// User-facing failure; converted into a failure response upstream.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// A candidate token names an authenticator that is not registered.
    #[error("no authenticator registered in firewall '{firewall}' for provider key '{provider_key}'")]
    NoMatchingAuthenticator {
        provider_key: ProviderKey,
        firewall: FirewallName,
    },

    /// An authenticator hook returned something that is not a valid response.
    #[error("the {authenticator}::{hook} method must return None or a valid response; it returned {returned}")]
    ContractViolation {
        authenticator: String,
        hook: &'static str,
        returned: String,
    },

    /// Remember-me configured for an authenticator that does not support it.
    #[error("authenticator '{authenticator}' in firewall '{firewall}' does not support remember-me")]
    RememberMeUnsupported {
        firewall: FirewallName,
        authenticator: String,
    },

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl GuardError {
    /// Whether the error indicates a defect rather than a rejected login.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Authentication(_))
    }

    /// The authentication failure, if this is one.
    pub fn as_authentication(&self) -> Option<&AuthenticationError> {
        match self {
            Self::Authentication(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_authentication_failures_are_recoverable() {
        assert!(!GuardError::from(AuthenticationError::UserNotFound).is_fatal());
        assert!(GuardError::from(TokenError::AlwaysUnauthenticated).is_fatal());
        assert!(
            GuardError::NoMatchingAuthenticator {
                provider_key: ProviderKey::new("main_3"),
                firewall: FirewallName::new("main"),
            }
            .is_fatal()
        );
    }

    #[test]
    fn contract_violation_names_offender_and_value() {
        let err = GuardError::ContractViolation {
            authenticator: "HeaderTokenAuthenticator".to_string(),
            hook: "on_authentication_success",
            returned: "response with invalid status code 42".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("HeaderTokenAuthenticator::on_authentication_success"));
        assert!(msg.contains("invalid status code 42"));
    }

    #[test]
    fn message_keys_hide_internal_detail() {
        let err = AuthenticationError::invalid_credentials("token signature mismatch");
        assert_eq!(err.message_key(), "Invalid credentials.");
        assert!(err.to_string().contains("signature"));
    }
}
