//! Human-readable rendering of timestamps and durations.

use chrono::{DateTime, TimeDelta, Utc};

/// Timestamp layout used in tool input and output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a timestamp with [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Renders a run time such as `1h2m3.5s`, `4.25s`, or `120ms`.
#[must_use]
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "splitting milliseconds into clock units"
)]
pub fn format_duration(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let total_ms = delta.num_milliseconds().unsigned_abs();
    if total_ms < 1000 {
        return format!("{sign}{total_ms}ms");
    }

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    let mut rendered = String::from(sign);
    if hours > 0 {
        rendered.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        rendered.push_str(&format!("{minutes}m"));
    }
    if millis == 0 {
        rendered.push_str(&format!("{seconds}s"));
    } else {
        let fraction = format!("{millis:03}");
        rendered.push_str(&format!("{seconds}.{}s", fraction.trim_end_matches('0')));
    }
    rendered
}
