//! Data time range processed by a long-running operation.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Seconds in one day of data.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// The `(start, end)` span of market data an operation must process.
///
/// The span drives both the sync/async execution policy and the progress
/// estimate. Ranges are not validated: an end before the start yields a
/// negative span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a time range.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns the range start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the range end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns `end - start`.
    #[must_use]
    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns the span in (possibly fractional) days.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "day spans are approximate by nature and well inside f64 precision"
    )]
    pub fn span_days(&self) -> f64 {
        let span = self.span();
        let seconds = span.num_seconds() as f64;
        let nanos = f64::from(span.subsec_nanos()) / 1_000_000_000.0;
        (seconds + nanos) / SECONDS_PER_DAY
    }
}
