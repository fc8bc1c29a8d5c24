use serde::Serialize;

use tokenguard_auth::{PostAuthenticationGuardToken, Role};
use tokenguard_core::{FirewallName, UserId};

/// Identity of the user a firewall authenticated for this request.
///
/// Inserted into request extensions by the firewall middleware; absent when the
/// request passed an anonymous zone without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub roles: Vec<Role>,
    pub firewall: FirewallName,
}

impl AuthenticatedUser {
    pub fn from_token(token: &PostAuthenticationGuardToken) -> Self {
        Self {
            user_id: token.user().id,
            username: token.username().to_string(),
            roles: token.roles().to_vec(),
            firewall: token.firewall().clone(),
        }
    }
}
