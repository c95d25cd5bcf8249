//! Typed errors for stats input
//!
//! Raised at the boundary, before any transform runs. Everything past
//! validation is total over its input and never fails.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced while decoding or validating a stats document
#[derive(Debug, Error)]
pub enum StatsError {
    /// Document is not valid JSON, or a required field is missing or mistyped
    #[error("invalid stats document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A daily-commit key is not a canonical `YYYY-MM-DD` calendar date
    #[error("invalid date key {key:?}: expected YYYY-MM-DD")]
    InvalidDate { key: String },

    /// A monthly-activity key is not `YYYY-MM`
    #[error("invalid month key {key:?} in {series}: expected YYYY-MM")]
    InvalidMonth { series: &'static str, key: String },

    /// A daily-commit date falls outside `date_range`
    #[error("date key {key:?} is outside date_range {start} .. {end}")]
    DateOutOfRange {
        key: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// An hourly-activity key is not an hour in `0..=23`
    #[error("invalid hour key {key:?}: expected 0..=23")]
    InvalidHour { key: String },

    /// `generated_at` is not a recognizable timestamp
    #[error("invalid generated_at timestamp {value:?}")]
    InvalidTimestamp { value: String },

    /// `date_range` bounds are unparseable or inverted
    #[error("invalid date_range: {reason}")]
    InvalidDateRange { reason: String },
}
