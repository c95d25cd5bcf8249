//! Calendar grid construction - lay sparse daily counts out as Sunday-first weeks
//!
//! Global invariants enforced:
//! - Every week row has exactly 7 cells
//! - A filled cell's column is its weekday (0 = Sunday)
//! - Filled cell count equals the number of input dates
//! - Cells keep chronological order, left to right, top row to bottom row
//! - Rows form a continuous calendar: weeks without data are all-empty rows

use crate::error::StatsError;
use crate::intensity::{self, IntensityLevel};
use crate::stats::{parse_iso_date, DailyCounts};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DAYS_PER_WEEK: usize = 7;

/// Locale-independent month abbreviations, January first
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Abbreviation for a 1-based month number; empty for anything outside 1..=12
pub fn month_abbreviation(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_ABBREVIATIONS[(month - 1) as usize],
        _ => "",
    }
}

/// One slot of a week row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayCell {
    Empty,
    Filled {
        date: NaiveDate,
        count: u64,
        level: IntensityLevel,
    },
}

impl DayCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DayCell::Empty => None,
            DayCell::Filled { date, .. } => Some(*date),
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            DayCell::Empty => 0,
            DayCell::Filled { count, .. } => *count,
        }
    }

    pub fn level(&self) -> IntensityLevel {
        match self {
            DayCell::Empty => IntensityLevel::None,
            DayCell::Filled { level, .. } => *level,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, DayCell::Filled { .. })
    }
}

/// Seven cells, Sunday through Saturday
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekRow {
    /// Sunday that opens this week
    pub start: NaiveDate,
    pub cells: [DayCell; DAYS_PER_WEEK],
}

impl WeekRow {
    fn empty(start: NaiveDate) -> Self {
        WeekRow {
            start,
            cells: std::array::from_fn(|_| DayCell::Empty),
        }
    }

    /// Date used for month labelling: the first filled day, or the opening
    /// Sunday when the row is all padding
    pub fn anchor(&self) -> NaiveDate {
        self.cells
            .iter()
            .find_map(DayCell::date)
            .unwrap_or(self.start)
    }
}

/// Week-aligned layout of daily counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub weeks: Vec<WeekRow>,
    /// Largest daily count; 0 for an empty grid
    pub max_count: u64,
}

impl CalendarGrid {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    pub fn filled_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks
            .iter()
            .flat_map(|week| week.cells.iter())
            .filter(|cell| cell.is_filled())
    }

    /// Sum of all daily counts in the grid
    pub fn total_count(&self) -> u64 {
        self.filled_cells().map(DayCell::count).sum()
    }
}

/// Month annotation above a week row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub week_index: usize,
    pub year: i32,
    pub month: &'static str,
}

/// Build the calendar grid for a sparse date → count mapping
///
/// Fails on the first key that is not a canonical `YYYY-MM-DD` date; no grid
/// is produced for partially valid input. An empty mapping yields a grid with
/// zero weeks.
///
/// The row count follows the span between the earliest and latest date, not
/// the number of keys: two dates years apart produce one row per week in
/// between. [`GitStatsData::validate`](crate::stats::GitStatsData::validate)
/// bounds that span by the document's `date_range`.
pub fn build_grid(counts: &DailyCounts) -> Result<CalendarGrid, StatsError> {
    let mut dated = BTreeMap::new();
    for (key, &count) in counts {
        dated.insert(parse_iso_date(key)?, count);
    }
    Ok(build_grid_from_dates(&dated))
}

/// Build the calendar grid from already-parsed dates
pub fn build_grid_from_dates(counts: &BTreeMap<NaiveDate, u64>) -> CalendarGrid {
    let max_count = counts.values().copied().max().unwrap_or(0);

    let mut weeks: Vec<WeekRow> = Vec::new();
    let mut current: Option<WeekRow> = None;

    for (&date, &count) in counts {
        let start = week_start(date);

        // A date in a later week closes the current row, plus any fully empty
        // weeks between the two.
        if current.as_ref().map(|row| row.start) != Some(start) {
            if let Some(row) = current.take() {
                let mut gap = row.start + Days::new(7);
                weeks.push(row);
                while gap < start {
                    weeks.push(WeekRow::empty(gap));
                    gap = gap + Days::new(7);
                }
            }
            current = Some(WeekRow::empty(start));
        }

        if let Some(row) = current.as_mut() {
            row.cells[weekday_index(date)] = DayCell::Filled {
                date,
                count,
                level: intensity::level(count, max_count),
            };
        }
    }

    if let Some(row) = current {
        weeks.push(row);
    }

    tracing::debug!(
        dates = counts.len(),
        weeks = weeks.len(),
        max_count,
        "built calendar grid"
    );

    CalendarGrid { weeks, max_count }
}

/// Emit a label whenever a week's anchor month differs from the last label
///
/// The first week always gets a label. Months are compared together with
/// their year, so January of consecutive years both get labelled.
pub fn label_months(grid: &CalendarGrid) -> Vec<MonthLabel> {
    let mut labels: Vec<MonthLabel> = Vec::new();
    let mut previous: Option<(i32, u32)> = None;

    for (week_index, week) in grid.weeks.iter().enumerate() {
        let anchor = week.anchor();
        let key = (anchor.year(), anchor.month());
        if previous != Some(key) {
            labels.push(MonthLabel {
                week_index,
                year: anchor.year(),
                month: month_abbreviation(anchor.month()),
            });
            previous = Some(key);
        }
    }

    labels
}

/// Column of a date within its week (0 = Sunday)
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// Sunday on or before `date`
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(weekday_index(date) as u64)
}
