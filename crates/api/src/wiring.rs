//! Builds live firewalls from [`SecurityConfig`].
//!
//! Authenticators are registered under string ids once at startup; the config
//! refers to them by id. Every wiring mistake (unknown id, remember-me on an
//! authenticator that cannot do it, overlapping names) is reported here, before
//! the server accepts a single request.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokenguard_auth::{
    AuthenticatorEntryPoint, GuardAuthenticationProvider, GuardAuthenticatorHandler,
    GuardAuthenticators, GuardFirewall, HeaderTokenAuthenticator, InteractiveLoginEvent,
    RememberMeServices, SharedAuthenticator, UserChecker, UserProvider,
};
use tokenguard_core::FirewallName;
use tokenguard_events::EventBus;

use crate::config::{ConfigError, FirewallConfig, HEADER_TOKEN_AUTHENTICATOR, SecurityConfig};

/// Authenticator instances by id.
#[derive(Clone, Default)]
pub struct AuthenticatorRegistry {
    by_id: HashMap<String, SharedAuthenticator>,
}

impl AuthenticatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing the built-in authenticators.
    pub fn with_defaults() -> Self {
        Self::new().with(HEADER_TOKEN_AUTHENTICATOR, Arc::new(HeaderTokenAuthenticator::new()))
    }

    pub fn with(mut self, id: impl Into<String>, authenticator: SharedAuthenticator) -> Self {
        self.by_id.insert(id.into(), authenticator);
        self
    }

    pub fn get(&self, id: &str) -> Option<&SharedAuthenticator> {
        self.by_id.get(id)
    }
}

/// Collaborators shared by every firewall.
#[derive(Clone)]
pub struct FirewallServices {
    pub user_provider: Arc<dyn UserProvider>,
    pub user_checker: Arc<dyn UserChecker>,
    pub events: Option<Arc<dyn EventBus<InteractiveLoginEvent>>>,
    pub remember_me: Option<Arc<dyn RememberMeServices>>,
}

/// Firewalls in configuration order, each with the path prefix it covers.
pub struct FirewallMap {
    firewalls: Vec<(String, GuardFirewall)>,
}

impl FirewallMap {
    pub fn build(
        config: &SecurityConfig,
        registry: &AuthenticatorRegistry,
        services: &FirewallServices,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut firewalls = Vec::with_capacity(config.firewalls.len());

        for firewall in &config.firewalls {
            if !seen.insert(firewall.name.as_str()) {
                return Err(ConfigError::DuplicateFirewall(firewall.name.clone()));
            }
            let guard = build_firewall(firewall, registry, services)?;
            tracing::info!(
                firewall = %firewall.name,
                pattern = %firewall.pattern,
                guards = firewall.guards.len(),
                anonymous = firewall.anonymous,
                "firewall configured"
            );
            firewalls.push((normalize_pattern(&firewall.pattern), guard));
        }

        Ok(Self { firewalls })
    }

    /// First firewall whose pattern covers `path`.
    pub fn firewall_for(&self, path: &str) -> Option<&GuardFirewall> {
        self.firewalls
            .iter()
            .find(|(pattern, _)| path_matches(pattern, path))
            .map(|(_, firewall)| firewall)
    }

    pub fn len(&self) -> usize {
        self.firewalls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.firewalls.is_empty()
    }
}

fn build_firewall(
    config: &FirewallConfig,
    registry: &AuthenticatorRegistry,
    services: &FirewallServices,
) -> Result<GuardFirewall, ConfigError> {
    if !config.pattern.starts_with('/') {
        return Err(ConfigError::InvalidPattern {
            firewall: config.name.clone(),
            pattern: config.pattern.clone(),
        });
    }
    if config.guards.is_empty() {
        return Err(ConfigError::NoGuards(config.name.clone()));
    }

    let lookup = |id: &str| {
        registry
            .get(id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownAuthenticator {
                firewall: config.name.clone(),
                authenticator: id.to_string(),
            })
    };

    let mut authenticators = GuardAuthenticators::new(FirewallName::from(config.name.clone()));
    for guard in &config.guards {
        authenticators.register(lookup(&guard.authenticator)?, guard.remember_me)?;
    }

    // An explicit entry point wins; otherwise the zone's own first authenticator challenges.
    let entry_point = match &config.entry_point {
        Some(id) => registry
            .get(id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownEntryPoint {
                firewall: config.name.clone(),
                entry_point: id.clone(),
            })?,
        None => lookup(&config.guards[0].authenticator)?,
    };

    let provider = GuardAuthenticationProvider::new(
        authenticators,
        services.user_provider.clone(),
        services.user_checker.clone(),
    );
    let handler = GuardAuthenticatorHandler::new(services.events.clone());

    let firewall = GuardFirewall::new(provider, handler, Arc::new(AuthenticatorEntryPoint(entry_point)))
        .allow_anonymous(config.anonymous);

    Ok(match &services.remember_me {
        Some(remember_me) => firewall.with_remember_me(remember_me.clone()),
        None => firewall,
    })
}

fn normalize_pattern(pattern: &str) -> String {
    pattern.trim_end_matches('/').to_string()
}

/// Segment-aware prefix match: `/api` covers `/api` and `/api/me`, not `/apix`.
fn path_matches(pattern: &str, path: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    match path.strip_prefix(pattern) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use tokenguard_auth::{DefaultUserChecker, InMemoryUserProvider};
    use tokenguard_core::GuardError;

    use super::*;
    use crate::config::GuardConfig;

    fn services() -> FirewallServices {
        FirewallServices {
            user_provider: Arc::new(InMemoryUserProvider::new()),
            user_checker: Arc::new(DefaultUserChecker::new()),
            events: None,
            remember_me: None,
        }
    }

    fn firewall(name: &str, pattern: &str, authenticator: &str) -> FirewallConfig {
        FirewallConfig {
            name: name.to_string(),
            pattern: pattern.to_string(),
            anonymous: false,
            entry_point: None,
            guards: vec![GuardConfig {
                authenticator: authenticator.to_string(),
                remember_me: false,
            }],
        }
    }

    fn build(config: SecurityConfig) -> Result<FirewallMap, ConfigError> {
        FirewallMap::build(&config, &AuthenticatorRegistry::with_defaults(), &services())
    }

    #[test]
    fn paths_are_matched_by_segment() {
        assert!(path_matches("/api", "/api"));
        assert!(path_matches("/api", "/api/me"));
        assert!(!path_matches("/api", "/apix"));
        assert!(!path_matches("/api", "/"));
        assert!(path_matches(&normalize_pattern("/"), "/anything"));
    }

    #[test]
    fn first_matching_firewall_wins() {
        let map = build(SecurityConfig {
            firewalls: vec![
                firewall("admin", "/api/admin", "header_token"),
                firewall("api", "/api/", "header_token"),
            ],
        })
        .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.firewall_for("/api/admin/users").unwrap().name().as_str(), "admin");
        assert_eq!(map.firewall_for("/api/me").unwrap().name().as_str(), "api");
        assert!(map.firewall_for("/health").is_none());
    }

    #[test]
    fn wiring_errors_are_reported_at_startup() {
        let err = build(SecurityConfig {
            firewalls: vec![firewall("a", "/a", "nope")],
        })
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::UnknownAuthenticator { .. }));

        let err = build(SecurityConfig {
            firewalls: vec![firewall("a", "/a", "header_token"), firewall("a", "/b", "header_token")],
        })
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::DuplicateFirewall(name) if name == "a"));

        let err = build(SecurityConfig {
            firewalls: vec![firewall("a", "a", "header_token")],
        })
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));

        let mut empty = firewall("a", "/a", "header_token");
        empty.guards.clear();
        let err = build(SecurityConfig { firewalls: vec![empty] }).err().unwrap();
        assert!(matches!(err, ConfigError::NoGuards(_)));

        let mut bad_entry = firewall("a", "/a", "header_token");
        bad_entry.entry_point = Some("missing".to_string());
        let err = build(SecurityConfig { firewalls: vec![bad_entry] }).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownEntryPoint { .. }));
    }

    #[test]
    fn remember_me_on_header_tokens_is_rejected() {
        let mut remembered = firewall("main", "/api", "header_token");
        remembered.guards[0].remember_me = true;

        let err = build(SecurityConfig {
            firewalls: vec![remembered],
        })
        .err()
        .unwrap();

        assert!(matches!(
            err,
            ConfigError::Guard(GuardError::RememberMeUnsupported { .. })
        ));
    }
}
