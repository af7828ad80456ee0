use serde::Serialize;

/// What the storefront gets back from a status query: a definite open or
/// closed answer plus the presentation fields that go with it. Derived
/// fresh on every call, never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub is_open: bool,
    pub is_temporarily_closed: bool,
    pub closure_reason: Option<String>,
    pub current_time: String,
    pub next_open_time: Option<String>,
}

impl Status {
    pub fn open(current_time: String) -> Self {
        Self {
            is_open: true,
            is_temporarily_closed: false,
            closure_reason: None,
            current_time,
            next_open_time: None,
        }
    }

    pub fn closed(current_time: String, reason: String, next_open_time: Option<String>) -> Self {
        Self {
            is_open: false,
            is_temporarily_closed: false,
            closure_reason: Some(reason),
            current_time,
            next_open_time,
        }
    }

    pub fn temporarily_closed(
        current_time: String,
        reason: String,
        next_open_time: Option<String>,
    ) -> Self {
        Self {
            is_open: false,
            is_temporarily_closed: true,
            closure_reason: Some(reason),
            current_time,
            next_open_time,
        }
    }

    /// The answer when the store cannot be read: closed, with no
    /// projection. The one thing this engine must never do is claim
    /// open without being able to confirm it.
    pub fn degraded(current_time: String) -> Self {
        Self {
            is_open: false,
            is_temporarily_closed: false,
            closure_reason: Some("Unable to determine status".to_string()),
            current_time,
            next_open_time: None,
        }
    }
}
