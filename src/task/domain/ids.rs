//! Identifier and free-text classification types for the task domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of hexadecimal characters kept from a random UUID.
const SHORT_ID_LEN: usize = 8;

/// Returns the first [`SHORT_ID_LEN`] hex characters of a fresh v4 UUID.
pub(crate) fn short_random_id() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SHORT_ID_LEN)
        .collect()
}

/// Short opaque identifier for an asynchronous task.
///
/// Identifiers are unique among the tasks a registry currently knows about.
/// They are not guaranteed to be unique across process restarts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(short_random_id())
    }

    /// Wraps a caller-supplied identifier, typically one being polled.
    ///
    /// No validation or normalisation is applied: an identifier that was
    /// never issued simply fails to resolve.
    #[must_use]
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-text classification of what a task is doing.
///
/// Kinds are used for filtering and for progress calibration lookup; they
/// are never validated against a fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKind(String);

impl TaskKind {
    /// Historical-data backtest over a local dataset.
    pub const BACKTEST: &'static str = "backtest";
    /// Backtest of a stored strategy script with result recording.
    pub const BACKTEST_MANAGED: &'static str = "backtest_managed";
    /// Bulk historical market data download.
    pub const DOWNLOAD: &'static str = "download";

    /// Creates a task kind from any label.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the kind label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for TaskKind {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskKind {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
