use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role granted to an authenticated user.
///
/// Roles are opaque strings at this layer (conventionally `ROLE_*`); what a role
/// allows is decided by whatever authorization layer reads the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Baseline role every authenticated user carries unless told otherwise.
    pub const USER: Role = Role(Cow::Borrowed("ROLE_USER"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}
