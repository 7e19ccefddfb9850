//! Live session records and the runner handle they own.

use crate::task::domain::short_random_id;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Short opaque identifier for a live session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiveSessionId(String);

impl LiveSessionId {
    /// Creates a new random session identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(short_random_id())
    }

    /// Wraps a caller-supplied identifier.
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

impl Default for LiveSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LiveSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Control handle over a running strategy in the wrapped framework.
#[async_trait]
pub trait LiveTradeHandle: Send + Sync {
    /// Stops the running strategy.
    ///
    /// # Errors
    ///
    /// Returns the framework's error message when shutdown fails.
    async fn stop(&self) -> Result<(), String>;
}

/// Request payload for registering a started live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartLiveSessionRequest {
    /// Exchange name, e.g. `binance`.
    pub exchange: String,
    /// Trading pair, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Strategy script path or name.
    pub script: String,
}

impl StartLiveSessionRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            symbol: symbol.into(),
            script: script.into(),
        }
    }
}

/// Snapshot of a registered live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveSession {
    id: LiveSessionId,
    exchange: String,
    symbol: String,
    script: String,
    started_at: DateTime<Utc>,
}

impl LiveSession {
    pub(super) fn new(request: StartLiveSessionRequest, clock: &impl Clock) -> Self {
        Self {
            id: LiveSessionId::new(),
            exchange: request.exchange,
            symbol: request.symbol,
            script: request.script,
            started_at: clock.utc(),
        }
    }

    pub(super) fn with_fresh_id(mut self) -> Self {
        self.id = LiveSessionId::new();
        self
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> &LiveSessionId {
        &self.id
    }

    /// Returns the exchange name.
    #[must_use]
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Returns the trading pair.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the strategy script.
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Returns when the session was registered.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
