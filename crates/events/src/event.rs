use chrono::{DateTime, Utc};

/// A security event.
///
/// Events are facts about something that already happened (a login, a logout)
/// and are never mutated after publication.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "security.interactive_login").
    fn event_type(&self) -> &'static str;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}
