//! `tokenguard-auth` — guard authentication protocol.
//!
//! Authenticators extract credentials, the provider dispatches a candidate
//! token to the one authenticator it belongs to, and the handler turns the
//! outcome into a stored token plus an optional response. [`GuardFirewall`]
//! runs that sequence for one protected zone.
//!
//! This crate is intentionally decoupled from HTTP: requests and responses are
//! plain views ([`RequestView`], [`AuthResponse`]) that a transport maps to and from.

pub mod authenticator;
pub mod credentials;
pub mod event;
pub mod firewall;
pub mod handler;
pub mod provider;
pub mod registry;
pub mod remember_me;
pub mod request;
pub mod response;
pub mod roles;
pub mod storage;
pub mod token;
pub mod token_authenticator;
pub mod user;
pub mod user_checker;
pub mod user_provider;

#[cfg(test)]
mod testing;

pub use authenticator::{
    AuthenticationEntryPoint, AuthenticatorEntryPoint, GuardAuthenticator, SharedAuthenticator,
};
pub use credentials::Credentials;
pub use event::InteractiveLoginEvent;
pub use firewall::{FirewallOutcome, GuardFirewall};
pub use handler::GuardAuthenticatorHandler;
pub use provider::GuardAuthenticationProvider;
pub use registry::{GuardAuthenticators, RegisteredAuthenticator};
pub use remember_me::RememberMeServices;
pub use request::RequestView;
pub use response::AuthResponse;
pub use roles::Role;
pub use storage::TokenStorage;
pub use token::{NonAuthenticatedGuardToken, PostAuthenticationGuardToken};
pub use token_authenticator::{DEFAULT_TOKEN_HEADER, HeaderTokenAuthenticator};
pub use user::{User, UserStatus};
pub use user_checker::{DefaultUserChecker, UserChecker};
pub use user_provider::{InMemoryUserProvider, UserProvider};
