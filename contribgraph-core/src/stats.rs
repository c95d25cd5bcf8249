//! Input model for precomputed Git contribution statistics
//!
//! The stats document is produced by an external collector and handed to us
//! as JSON. Decoding rejects missing or mistyped fields (negative or
//! fractional counts included); [`GitStatsData::validate`] then rejects keys
//! and timestamps that decode as strings but do not mean anything.
//!
//! Global invariants enforced:
//! - Nothing downstream of [`GitStatsData::from_json`] sees unvalidated input
//! - Unknown top-level fields are ignored, never interpreted

use crate::error::StatsError;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Sparse mapping of ISO date (`YYYY-MM-DD`) to commit count
pub type DailyCounts = BTreeMap<String, u64>;

/// Weekdays in display order (Sunday first)
pub const WEEKDAYS_SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Complete stats document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitStatsData {
    pub generated_at: String,
    pub date_range: DateRange,
    pub lifetime_stats: LifetimeStats,
    pub code_contribution: CodeContribution,
    pub contribution_calendar: ContributionCalendar,
    pub monthly_activity: MonthlyActivity,
    pub weekday_activity: WeekdayActivity,
    /// Sparse, keyed `"0"` through `"23"`
    pub hourly_activity: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LifetimeStats {
    pub total_commits: u64,
    pub total_prs: u64,
    pub files_changed: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeContribution {
    pub lines_added: u64,
    pub lines_deleted: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContributionCalendar {
    pub daily_commits: DailyCounts,
}

/// Per-month activity, keyed `YYYY-MM`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyActivity {
    pub commits: BTreeMap<String, u64>,
    pub pull_requests: BTreeMap<String, u64>,
    pub code_changes: BTreeMap<String, LineChanges>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineChanges {
    pub added: u64,
    pub deleted: u64,
}

impl LineChanges {
    pub fn total(&self) -> u64 {
        self.added.saturating_add(self.deleted)
    }
}

/// Commit counts per weekday; all seven days are required
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct WeekdayActivity {
    pub monday: u64,
    pub tuesday: u64,
    pub wednesday: u64,
    pub thursday: u64,
    pub friday: u64,
    pub saturday: u64,
    pub sunday: u64,
}

impl WeekdayActivity {
    pub fn get(&self, day: Weekday) -> u64 {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

impl GitStatsData {
    /// Decode and validate a stats document
    pub fn from_json(json: &str) -> Result<Self, StatsError> {
        let data: GitStatsData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Check every key and timestamp that the transforms rely on
    pub fn validate(&self) -> Result<(), StatsError> {
        self.generated_timestamp()?;
        let (start, end) = self.parsed_date_range()?;

        for key in self.contribution_calendar.daily_commits.keys() {
            let date = parse_iso_date(key)?;
            if date < start || date > end {
                return Err(StatsError::DateOutOfRange {
                    key: key.clone(),
                    start,
                    end,
                });
            }
        }

        let activity = &self.monthly_activity;
        for key in activity.commits.keys() {
            parse_month_key(key).ok_or_else(|| invalid_month("commits", key))?;
        }
        for key in activity.pull_requests.keys() {
            parse_month_key(key).ok_or_else(|| invalid_month("pull_requests", key))?;
        }
        for key in activity.code_changes.keys() {
            parse_month_key(key).ok_or_else(|| invalid_month("code_changes", key))?;
        }

        for key in self.hourly_activity.keys() {
            parse_hour_key(key).ok_or_else(|| StatsError::InvalidHour { key: key.clone() })?;
        }

        Ok(())
    }

    /// `generated_at` as a wall-clock timestamp
    pub fn generated_timestamp(&self) -> Result<NaiveDateTime, StatsError> {
        parse_timestamp(&self.generated_at).ok_or_else(|| StatsError::InvalidTimestamp {
            value: self.generated_at.clone(),
        })
    }

    /// `date_range` bounds as dates, start never after end
    pub fn parsed_date_range(&self) -> Result<(NaiveDate, NaiveDate), StatsError> {
        let start = parse_range_bound(&self.date_range.start_date, "start_date")?;
        let end = parse_range_bound(&self.date_range.end_date, "end_date")?;
        if start > end {
            return Err(StatsError::InvalidDateRange {
                reason: format!("start_date {} is after end_date {}", start, end),
            });
        }
        Ok((start, end))
    }
}

/// Read, decode and validate a stats document from disk
pub fn load_stats(path: &Path) -> Result<GitStatsData> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read stats file: {}", path.display()))?;
    let data = GitStatsData::from_json(&json)
        .with_context(|| format!("failed to load stats from {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        days = data.contribution_calendar.daily_commits.len(),
        "loaded stats document"
    );
    Ok(data)
}

/// Parse a canonical `YYYY-MM-DD` date
///
/// Non-canonical spellings such as `2024-1-5` are rejected: they would sort
/// out of chronological order as strings.
pub fn parse_iso_date(key: &str) -> Result<NaiveDate, StatsError> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .ok()
        .filter(|date| date.format("%Y-%m-%d").to_string() == key)
        .ok_or_else(|| StatsError::InvalidDate {
            key: key.to_string(),
        })
}

/// Parse a `YYYY-MM` month key into (year, month)
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

/// Parse an hour key (`"0"` through `"23"`)
pub fn parse_hour_key(key: &str) -> Option<u32> {
    let hour: u32 = key.parse().ok()?;
    (hour < 24 && hour.to_string() == key).then_some(hour)
}

/// Accepts RFC 3339, naive ISO datetimes (with `T` or space), or a bare date
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_range_bound(value: &str, field: &str) -> Result<NaiveDate, StatsError> {
    if let Ok(date) = parse_iso_date(value) {
        return Ok(date);
    }
    parse_timestamp(value)
        .map(|dt| dt.date())
        .ok_or_else(|| StatsError::InvalidDateRange {
            reason: format!("{} {:?} is not a date", field, value),
        })
}

fn invalid_month(series: &'static str, key: &str) -> StatsError {
    StatsError::InvalidMonth {
        series,
        key: key.to_string(),
    }
}
