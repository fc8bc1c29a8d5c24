//! Transport-agnostic view of an inbound request.

use std::collections::BTreeMap;

/// The parts of a request authenticators are allowed to inspect.
///
/// Header names are matched case-insensitively. `Debug` lists header names
/// only, since values routinely carry secrets.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct RequestView {
    method: String,
    path: String,
    headers: BTreeMap<String, String>,
}

impl RequestView {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Later values for the same name replace earlier ones.
    pub fn insert_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl core::fmt::Debug for RequestView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RequestView")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive() {
        let request = RequestView::new("GET", "/api/me").with_header("X-AUTH-TOKEN", "abc123");

        assert_eq!(request.header("x-auth-token"), Some("abc123"));
        assert_eq!(request.header("X-Auth-Token"), Some("abc123"));
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn debug_output_hides_header_values() {
        let request = RequestView::new("GET", "/").with_header("X-AUTH-TOKEN", "s3cr3t");
        let rendered = format!("{request:?}");

        assert!(rendered.contains("x-auth-token"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
