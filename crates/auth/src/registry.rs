//! Per-firewall registry of guard authenticators.

use tokenguard_core::{FirewallName, GuardError, GuardResult, ProviderKey};

use crate::SharedAuthenticator;

/// One authenticator registered in a firewall.
#[derive(Clone)]
pub struct RegisteredAuthenticator {
    key: ProviderKey,
    authenticator: SharedAuthenticator,
    remember_me: bool,
}

impl RegisteredAuthenticator {
    pub fn key(&self) -> &ProviderKey {
        &self.key
    }

    pub fn authenticator(&self) -> &SharedAuthenticator {
        &self.authenticator
    }

    pub fn remember_me(&self) -> bool {
        self.remember_me
    }
}

impl core::fmt::Debug for RegisteredAuthenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisteredAuthenticator")
            .field("key", &self.key)
            .field("authenticator", &self.authenticator.name())
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

/// Ordered (provider key, authenticator) pairs of one firewall.
///
/// Built once at startup and read-only afterwards. Keys are assigned from the
/// registration position, so they are unique within the firewall by construction.
#[derive(Debug, Clone)]
pub struct GuardAuthenticators {
    firewall: FirewallName,
    entries: Vec<RegisteredAuthenticator>,
}

impl GuardAuthenticators {
    pub fn new(firewall: FirewallName) -> Self {
        Self {
            firewall,
            entries: Vec::new(),
        }
    }

    /// Register an authenticator and return the key bound to it.
    ///
    /// Fails with `RememberMeUnsupported` when `remember_me` is requested for an
    /// authenticator that does not support it.
    pub fn register(
        &mut self,
        authenticator: SharedAuthenticator,
        remember_me: bool,
    ) -> GuardResult<ProviderKey> {
        if remember_me && !authenticator.supports_remember_me() {
            return Err(GuardError::RememberMeUnsupported {
                firewall: self.firewall.clone(),
                authenticator: authenticator.name().to_string(),
            });
        }

        let key = ProviderKey::for_guard(&self.firewall, self.entries.len());
        tracing::debug!(firewall = %self.firewall, key = %key, authenticator = authenticator.name(), "registered guard authenticator");

        self.entries.push(RegisteredAuthenticator {
            key: key.clone(),
            authenticator,
            remember_me,
        });
        Ok(key)
    }

    pub fn with(mut self, authenticator: SharedAuthenticator) -> GuardResult<Self> {
        self.register(authenticator, false)?;
        Ok(self)
    }

    pub fn firewall(&self) -> &FirewallName {
        &self.firewall
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredAuthenticator> {
        self.entries.iter()
    }

    pub fn first(&self) -> Option<&RegisteredAuthenticator> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::RecordingAuthenticator;

    #[test]
    fn keys_follow_registration_order() {
        let mut authenticators = GuardAuthenticators::new(FirewallName::new("main"));

        let a = authenticators.register(Arc::new(RecordingAuthenticator::new("a")), false).unwrap();
        let b = authenticators.register(Arc::new(RecordingAuthenticator::new("b")), false).unwrap();

        assert_eq!(a.as_str(), "main_0");
        assert_eq!(b.as_str(), "main_1");
        assert_eq!(authenticators.first().unwrap().key(), &a);
    }

    #[test]
    fn remember_me_requires_support() {
        let mut authenticators = GuardAuthenticators::new(FirewallName::new("main"));

        let err = authenticators
            .register(Arc::new(RecordingAuthenticator::new("plain")), true)
            .unwrap_err();
        assert!(matches!(err, GuardError::RememberMeUnsupported { .. }));
        assert!(authenticators.is_empty());

        let supported = RecordingAuthenticator::new("rm").supporting_remember_me();
        assert!(authenticators.register(Arc::new(supported), true).is_ok());
        assert!(authenticators.first().unwrap().remember_me());
    }
}
