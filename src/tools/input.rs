//! Parsing of tool arguments.

use super::TIMESTAMP_FORMAT;
use crate::task::domain::TimeRange;
use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// Errors returned while parsing tool arguments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolInputError {
    /// A time argument does not follow [`TIMESTAMP_FORMAT`].
    #[error("invalid {field} time '{value}': {source}")]
    InvalidTime {
        /// Argument name.
        field: &'static str,
        /// Raw argument value.
        value: String,
        /// Parser failure.
        source: chrono::ParseError,
    },
}

/// Parses a `YYYY-MM-DD HH:MM:SS` UTC timestamp.
///
/// # Errors
///
/// Returns [`ToolInputError::InvalidTime`] naming `field` when the value
/// is malformed.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, ToolInputError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| ToolInputError::InvalidTime {
            field,
            value: value.to_owned(),
            source,
        })
}

/// Parses the `start` and `end` arguments of a range-driven tool.
///
/// # Errors
///
/// Returns [`ToolInputError::InvalidTime`] for the first malformed value.
pub fn parse_time_range(start: &str, end: &str) -> Result<TimeRange, ToolInputError> {
    Ok(TimeRange::new(
        parse_timestamp("start", start)?,
        parse_timestamp("end", end)?,
    ))
}
