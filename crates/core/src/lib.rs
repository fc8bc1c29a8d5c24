//! `tokenguard-core` — identifiers and error taxonomy shared by the guard layer.
//!
//! This crate contains no IO and knows nothing about HTTP.

pub mod error;
pub mod id;

pub use error::{AuthenticationError, GuardError, GuardResult, TokenError};
pub use id::{FirewallName, ProviderKey, UserId};
