use crate::PostAuthenticationGuardToken;

/// Holder of the current request's authenticated token.
///
/// One instance per in-flight request: the firewall creates it empty, the
/// handler sets it on success and clears it on failure, and the transport
/// layer takes the final value once the firewall is done. It is passed by
/// `&mut` rather than shared, so there is never more than one writer.
#[derive(Debug, Clone, Default)]
pub struct TokenStorage {
    token: Option<PostAuthenticationGuardToken>,
}

impl TokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&PostAuthenticationGuardToken> {
        self.token.as_ref()
    }

    /// Last write wins.
    pub fn set_token(&mut self, token: Option<PostAuthenticationGuardToken>) {
        self.token = token;
    }

    pub fn clear(&mut self) {
        self.token = None;
    }

    pub fn take(&mut self) -> Option<PostAuthenticationGuardToken> {
        self.token.take()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
