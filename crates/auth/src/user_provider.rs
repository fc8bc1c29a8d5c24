//! User lookup seam.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::User;

/// Resolves users from credential tokens.
///
/// Lookups are synchronous and may be slow (database, remote directory); the
/// guard layer treats them as opaque. `None` means "no such user".
pub trait UserProvider: Send + Sync {
    fn load_user_by_token(&self, token: &str) -> Option<User>;
}

impl<P> UserProvider for Arc<P>
where
    P: UserProvider + ?Sized,
{
    fn load_user_by_token(&self, token: &str) -> Option<User> {
        (**self).load_user_by_token(token)
    }
}

/// Token → user map held in memory (dev, tests, static deployments).
#[derive(Debug, Default)]
pub struct InMemoryUserProvider {
    by_token: RwLock<HashMap<String, User>>,
}

impl InMemoryUserProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: User) -> Self {
        self.insert(token, user);
        self
    }

    pub fn insert(&self, token: impl Into<String>, user: User) {
        if let Ok(mut map) = self.by_token.write() {
            map.insert(token.into(), user);
        }
    }

    pub fn revoke(&self, token: &str) -> Option<User> {
        self.by_token.write().ok()?.remove(token)
    }

    pub fn len(&self) -> usize {
        self.by_token.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserProvider for InMemoryUserProvider {
    fn load_user_by_token(&self, token: &str) -> Option<User> {
        self.by_token.read().ok()?.get(token).cloned()
    }
}
