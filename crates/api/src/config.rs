//! Security configuration (firewalls, guards, demo users).
//!
//! Configuration is plain data: it names authenticators by id and says which
//! paths each firewall protects. Turning it into live firewalls happens in
//! [`crate::wiring`].
//!
//! Environment:
//! - `TOKENGUARD_CONFIG`: path to a JSON [`SecurityConfig`] (default: built-in).
//! - `TOKENGUARD_USERS`: JSON array of [`UserRecord`]s (default: none).
//! - `TOKENGUARD_ADDR`: bind address (default: `0.0.0.0:8080`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tokenguard_auth::{InMemoryUserProvider, Role, User, UserStatus};
use tokenguard_core::{GuardError, UserId};

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// Id under which the header token authenticator is registered by default.
pub const HEADER_TOKEN_AUTHENTICATOR: &str = "header_token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("firewall '{0}' is defined more than once")]
    DuplicateFirewall(String),

    #[error("firewall '{firewall}' has pattern '{pattern}', which does not start with '/'")]
    InvalidPattern { firewall: String, pattern: String },

    #[error("firewall '{0}' has no guards")]
    NoGuards(String),

    #[error("firewall '{firewall}' references unknown authenticator '{authenticator}'")]
    UnknownAuthenticator {
        firewall: String,
        authenticator: String,
    },

    #[error("firewall '{firewall}' references unknown entry point '{entry_point}'")]
    UnknownEntryPoint {
        firewall: String,
        entry_point: String,
    },

    #[error(transparent)]
    Guard(#[from] GuardError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    #[serde(default)]
    pub firewalls: Vec<FirewallConfig>,
}

/// One protected zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirewallConfig {
    pub name: String,

    /// Path prefix the firewall covers (segment-aware; `/` covers everything).
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Let requests without credentials through instead of challenging them.
    #[serde(default)]
    pub anonymous: bool,

    /// Authenticator id whose `start` builds the challenge.
    /// Defaults to the first guard's authenticator.
    #[serde(default)]
    pub entry_point: Option<String>,

    pub guards: Vec<GuardConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    pub authenticator: String,

    #[serde(default)]
    pub remember_me: bool,
}

fn default_pattern() -> String {
    "/".to_string()
}

impl Default for SecurityConfig {
    /// A single `main` firewall protecting `/api` with the header token authenticator.
    fn default() -> Self {
        Self {
            firewalls: vec![FirewallConfig {
                name: "main".to_string(),
                pattern: "/api".to_string(),
                anonymous: false,
                entry_point: None,
                guards: vec![GuardConfig {
                    authenticator: HEADER_TOKEN_AUTHENTICATOR.to_string(),
                    remember_me: false,
                }],
            }],
        }
    }
}

impl SecurityConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os("TOKENGUARD_CONFIG") {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

/// A token-bearing user for the in-memory user provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserRecord {
    pub token: String,
    /// Stable id; a fresh one is generated when absent.
    #[serde(default)]
    pub id: Option<UserId>,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub status: UserStatus,
}

impl UserRecord {
    fn into_user(self) -> User {
        let mut user = User::new(self.username).with_status(self.status);
        if let Some(id) = self.id {
            user = user.with_id(id);
        }
        if self.roles.is_empty() {
            user
        } else {
            user.with_roles(self.roles)
        }
    }
}

pub fn users_from_json(json: &str) -> Result<InMemoryUserProvider, ConfigError> {
    let records: Vec<UserRecord> = serde_json::from_str(json)?;

    let provider = InMemoryUserProvider::new();
    for record in records {
        let token = record.token.clone();
        provider.insert(token, record.into_user());
    }
    Ok(provider)
}

pub fn users_from_env() -> Result<InMemoryUserProvider, ConfigError> {
    match std::env::var("TOKENGUARD_USERS") {
        Ok(json) => users_from_json(&json),
        Err(_) => Ok(InMemoryUserProvider::new()),
    }
}

pub fn bind_addr_from_env() -> String {
    std::env::var("TOKENGUARD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string())
}

#[cfg(test)]
mod tests {
    use tokenguard_auth::UserProvider;

    use super::*;

    #[test]
    fn minimal_firewall_gets_defaults() {
        let config = SecurityConfig::from_json(
            r#"{ "firewalls": [ { "name": "api", "guards": [ { "authenticator": "header_token" } ] } ] }"#,
        )
        .unwrap();

        let firewall = &config.firewalls[0];
        assert_eq!(firewall.pattern, "/");
        assert!(!firewall.anonymous);
        assert_eq!(firewall.entry_point, None);
        assert!(!firewall.guards[0].remember_me);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SecurityConfig::from_json(r#"{ "firewals": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn default_config_protects_api() {
        let config = SecurityConfig::default();
        assert_eq!(config.firewalls.len(), 1);
        assert_eq!(config.firewalls[0].pattern, "/api");
        assert_eq!(config.firewalls[0].guards[0].authenticator, HEADER_TOKEN_AUTHENTICATOR);
    }

    #[test]
    fn users_load_with_default_role_and_status() {
        let provider = users_from_json(
            r#"[
                { "token": "abc123", "username": "alice" },
                { "token": "root", "id": "0190a5e2-7c4f-7d3a-9b1e-2f4c6d8e0a1b", "username": "admin", "roles": ["ROLE_ADMIN"], "status": "locked" }
            ]"#,
        )
        .unwrap();

        let alice = provider.load_user_by_token("abc123").unwrap();
        assert_eq!(alice.roles, vec![Role::USER]);
        assert_eq!(alice.status, UserStatus::Active);

        let admin = provider.load_user_by_token("root").unwrap();
        assert_eq!(admin.id.to_string(), "0190a5e2-7c4f-7d3a-9b1e-2f4c6d8e0a1b");
        assert!(admin.has_role("ROLE_ADMIN"));
        assert_eq!(admin.status, UserStatus::Locked);
    }
}
