use chrono::{DateTime, Utc};

use tokenguard_events::Event;

use crate::{PostAuthenticationGuardToken, RequestView};

/// Published every time a token is persisted by the guard handler.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveLoginEvent {
    pub request: RequestView,
    pub token: PostAuthenticationGuardToken,
    pub occurred_at: DateTime<Utc>,
}

impl InteractiveLoginEvent {
    pub const EVENT_TYPE: &'static str = "security.interactive_login";

    pub fn new(request: RequestView, token: PostAuthenticationGuardToken) -> Self {
        Self {
            request,
            token,
            occurred_at: Utc::now(),
        }
    }
}

impl Event for InteractiveLoginEvent {
    fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
