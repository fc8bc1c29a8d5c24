//! Responses produced by authenticator hooks.

use serde_json::{Value, json};

/// A protocol-level response an authenticator asks the firewall to send.
///
/// Fields are deliberately raw (`u16` status, string headers) so that the
/// guard layer stays independent of any HTTP crate. The handler checks every
/// response coming out of a hook with [`AuthResponse::validate`] before it is
/// allowed anywhere near the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Value,
}

impl AuthResponse {
    /// JSON response with the given status.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    /// `{"message": ...}` payload, the shape every built-in authenticator uses.
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "message": message.into() }))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Check that this is something a transport can actually send.
    ///
    /// On failure, returns a description of the illegal value.
    pub fn validate(&self) -> Result<(), String> {
        if !(100..=599).contains(&self.status) {
            return Err(format!("a response with invalid status code {}", self.status));
        }
        for (name, value) in &self.headers {
            if name.is_empty() || !name.bytes().all(is_token_char) {
                return Err(format!("a response with invalid header name {name:?}"));
            }
            if value.bytes().any(|b| (b < 0x20 && b != b'\t') || b == 0x7f) {
                return Err(format!("a response with an invalid value for header {name:?}"));
            }
        }
        Ok(())
    }
}

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
