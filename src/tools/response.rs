//! Tool call results.

use serde::Serialize;
use tracing::warn;

/// Result of one tool call: a text body and an error flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    is_error: bool,
    text: String,
}

impl ToolResponse {
    /// Creates a successful response with a pretty-printed JSON body.
    #[must_use]
    pub fn json(body: &impl Serialize) -> Self {
        Self::from_json(false, body)
    }

    /// Creates an error response with a pretty-printed JSON body.
    #[must_use]
    pub fn json_error(body: &impl Serialize) -> Self {
        Self::from_json(true, body)
    }

    /// Creates an error response with a plain message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            text: message.into(),
        }
    }

    fn from_json(is_error: bool, body: &impl Serialize) -> Self {
        match serde_json::to_string_pretty(body) {
            Ok(text) => Self { is_error, text },
            Err(err) => {
                warn!(error = %err, "failed to serialize tool response");
                Self::error(format!("failed to serialize response: {err}"))
            }
        }
    }

    /// Returns `true` when the call failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }

    /// Returns the response body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parses the body as JSON, if it is JSON.
    #[must_use]
    pub fn body(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.text).ok()
    }
}
