//! User model as seen by the guard layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokenguard_core::UserId;

use crate::Role;

// ─────────────────────────────────────────────────────────────────────────────
// User Status
// ─────────────────────────────────────────────────────────────────────────────

/// Account status checked before a login is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User may authenticate.
    #[default]
    Active,
    /// Administratively disabled.
    Disabled,
    /// Locked (e.g. too many failed attempts).
    Locked,
    /// Account validity period is over.
    Expired,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "Active"),
            UserStatus::Disabled => write!(f, "Disabled"),
            UserStatus::Locked => write!(f, "Locked"),
            UserStatus::Expired => write!(f, "Expired"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// A user resolved by a [`UserProvider`](crate::UserProvider).
///
/// # Invariants
/// - `username` is never empty for users handed out by providers.
/// - `roles` is what ends up on the authenticated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub roles: Vec<Role>,
    pub status: UserStatus,
    pub credentials_expire_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            roles: vec![Role::USER],
            status: UserStatus::Active,
            credentials_expire_at: None,
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_credentials_expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.credentials_expire_at = Some(at);
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }
}
