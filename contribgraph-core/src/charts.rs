//! Bar-chart series - weekday, hour-of-day and monthly views
//!
//! Each view fills missing keys with zero, takes a per-series maximum and
//! scales every value to a percentage of it.
//!
//! Global invariants enforced:
//! - The maximum of an empty series is 0
//! - A zero maximum yields 0% everywhere, never NaN
//! - Output order is fixed (weekday: Sunday first, hourly: 0..23, monthly: ascending key)

use crate::format::{format_hour, format_month_key};
use crate::stats::{MonthlyActivity, WeekdayActivity, WEEKDAYS_SUNDAY_FIRST};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const HOURS_PER_DAY: u32 = 24;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// `value` as a percentage of `max`; 0 when `max` is 0
pub fn percentage(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max * 100.0
    } else {
        0.0
    }
}

/// Largest value in a series; 0 when the series is empty
pub fn series_max<I: IntoIterator<Item = u64>>(values: I) -> u64 {
    values.into_iter().max().unwrap_or(0)
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayBar {
    pub day: &'static str,
    pub short_day: &'static str,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySeries {
    pub bars: Vec<WeekdayBar>,
    pub max: u64,
    /// Day with the highest count; ties go to the earliest day, Sunday first
    pub most_active: &'static str,
}

pub fn weekday_series(activity: &WeekdayActivity) -> WeekdaySeries {
    let max = series_max(WEEKDAYS_SUNDAY_FIRST.iter().map(|&d| activity.get(d)));

    let bars: Vec<WeekdayBar> = WEEKDAYS_SUNDAY_FIRST
        .iter()
        .map(|&day| {
            let name = weekday_name(day);
            let count = activity.get(day);
            WeekdayBar {
                day: name,
                short_day: &name[..3],
                count,
                percentage: percentage(count as f64, max as f64),
            }
        })
        .collect();

    // Strict comparison keeps the first of several equal maxima
    let mut most_active = &bars[0];
    for bar in &bars[1..] {
        if bar.count > most_active.count {
            most_active = bar;
        }
    }
    let most_active = most_active.day;

    WeekdaySeries {
        bars,
        max,
        most_active,
    }
}

/// How raw hourly buckets are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyPolicy {
    /// Shift applied to every hour key before display, in minutes
    pub utc_offset_minutes: i32,
    /// Halve every count, treating each bucket as covering two hours
    pub bi_hourly: bool,
}

/// Coarse part of the day, used to color hourly bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,   // 5AM-12PM
    Afternoon, // 12PM-6PM
    Evening,   // 6PM-10PM
    Night,     // 10PM-5AM
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 4] = [
        DayPeriod::Morning,
        DayPeriod::Afternoon,
        DayPeriod::Evening,
        DayPeriod::Night,
    ];

    pub fn of_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPeriod::Morning,
            12..=17 => DayPeriod::Afternoon,
            18..=21 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Evening => "evening",
            DayPeriod::Night => "night",
        }
    }

    pub fn legend_label(&self) -> &'static str {
        match self {
            DayPeriod::Morning => "Morning (5AM-12PM)",
            DayPeriod::Afternoon => "Afternoon (12PM-6PM)",
            DayPeriod::Evening => "Evening (6PM-10PM)",
            DayPeriod::Night => "Night (10PM-5AM)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourBar {
    pub hour: u32,
    pub label: String,
    pub period: DayPeriod,
    pub count: f64,
    pub percentage: f64,
}

/// Hour-of-day series, always 24 bars ordered by displayed hour
///
/// Keys that are not hours are skipped; validation rejects them upstream.
pub fn hourly_series(activity: &BTreeMap<String, u64>, policy: &HourlyPolicy) -> Vec<HourBar> {
    let mut buckets = [0.0f64; HOURS_PER_DAY as usize];

    for hour in 0..HOURS_PER_DAY {
        let count = activity.get(&hour.to_string()).copied().unwrap_or(0) as f64;
        let value = if policy.bi_hourly { count / 2.0 } else { count };
        buckets[shift_hour(hour, policy.utc_offset_minutes) as usize] += value;
    }

    let max = buckets.iter().copied().fold(0.0f64, f64::max);

    buckets
        .iter()
        .zip(0u32..)
        .map(|(&count, hour)| HourBar {
            hour,
            label: format_hour(hour),
            period: DayPeriod::of_hour(hour),
            count,
            percentage: percentage(count, max),
        })
        .collect()
}

/// Shift an hour by an offset in minutes, rounding half-hours up and wrapping
pub fn shift_hour(hour: u32, offset_minutes: i32) -> u32 {
    let minutes = (i64::from(hour) * 60 + i64::from(offset_minutes)).rem_euclid(MINUTES_PER_DAY);
    (((minutes + 30) / 60) % i64::from(HOURS_PER_DAY)) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBar {
    /// `YYYY-MM`
    pub month: String,
    /// Display label such as `Mar 24`
    pub label: String,
    pub commits: u64,
    pub pull_requests: u64,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub commit_percentage: f64,
    pub pr_percentage: f64,
    /// Added + deleted, relative to the busiest month
    pub change_percentage: f64,
    /// Share of this month's changed lines that were additions (0..=1)
    pub added_share: f64,
    pub deleted_share: f64,
}

/// Monthly series over every month present in any of the three maps
pub fn monthly_series(activity: &MonthlyActivity) -> Vec<MonthBar> {
    let months: BTreeSet<&String> = activity
        .commits
        .keys()
        .chain(activity.pull_requests.keys())
        .chain(activity.code_changes.keys())
        .collect();

    let max_commits = series_max(activity.commits.values().copied());
    let max_prs = series_max(activity.pull_requests.values().copied());
    let max_changes = series_max(activity.code_changes.values().map(|c| c.total()));

    months
        .into_iter()
        .map(|month| {
            let commits = activity.commits.get(month).copied().unwrap_or(0);
            let pull_requests = activity.pull_requests.get(month).copied().unwrap_or(0);
            let changes = activity.code_changes.get(month).copied().unwrap_or_default();
            let total = changes.total();
            let (added_share, deleted_share) = if total > 0 {
                (
                    changes.added as f64 / total as f64,
                    changes.deleted as f64 / total as f64,
                )
            } else {
                (0.0, 0.0)
            };

            MonthBar {
                month: month.clone(),
                label: format_month_key(month),
                commits,
                pull_requests,
                lines_added: changes.added,
                lines_deleted: changes.deleted,
                commit_percentage: percentage(commits as f64, max_commits as f64),
                pr_percentage: percentage(pull_requests as f64, max_prs as f64),
                change_percentage: percentage(total as f64, max_changes as f64),
                added_share,
                deleted_share,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::LineChanges;

    #[test]
    fn test_all_zero_weekdays() {
        let series = weekday_series(&WeekdayActivity::default());
        assert_eq!(series.max, 0);
        assert!(series.bars.iter().all(|b| b.percentage == 0.0));
        assert_eq!(series.most_active, "Sunday");
    }

    #[test]
    fn test_weekday_order_and_scaling() {
        let activity = WeekdayActivity {
            monday: 10,
            tuesday: 20,
            wednesday: 40,
            thursday: 5,
            friday: 0,
            saturday: 1,
            sunday: 2,
        };
        let series = weekday_series(&activity);
        let days: Vec<&str> = series.bars.iter().map(|b| b.short_day).collect();
        assert_eq!(days, vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
        assert_eq!(series.bars[3].percentage, 100.0);
        assert_eq!(series.bars[2].percentage, 50.0);
        assert_eq!(series.bars[5].percentage, 0.0);
        assert_eq!(series.most_active, "Wednesday");
    }

    #[test]
    fn test_weekday_tie_goes_to_earliest_day() {
        let activity = WeekdayActivity {
            monday: 7,
            friday: 7,
            ..WeekdayActivity::default()
        };
        assert_eq!(weekday_series(&activity).most_active, "Monday");
    }

    #[test]
    fn test_hourly_fills_all_hours() {
        let activity: BTreeMap<String, u64> = [("9".to_string(), 4), ("14".to_string(), 8)]
            .into_iter()
            .collect();
        let bars = hourly_series(&activity, &HourlyPolicy::default());
        assert_eq!(bars.len(), 24);
        assert_eq!(bars[9].count, 4.0);
        assert_eq!(bars[9].percentage, 50.0);
        assert_eq!(bars[14].percentage, 100.0);
        assert_eq!(bars[0].count, 0.0);
        assert_eq!(bars[0].label, "12AM");
        assert_eq!(bars[14].period, DayPeriod::Afternoon);
    }

    #[test]
    fn test_hourly_empty_activity() {
        let bars = hourly_series(&BTreeMap::new(), &HourlyPolicy::default());
        assert_eq!(bars.len(), 24);
        assert!(bars.iter().all(|b| b.percentage == 0.0 && !b.percentage.is_nan()));
    }

    #[test]
    fn test_hourly_shift_and_halving() {
        let activity: BTreeMap<String, u64> = [("0".to_string(), 6), ("18".to_string(), 2)]
            .into_iter()
            .collect();
        let policy = HourlyPolicy {
            utc_offset_minutes: 330,
            bi_hourly: true,
        };
        let bars = hourly_series(&activity, &policy);
        // 00:00 UTC + 5:30 -> 05:30, rounds to 6
        assert_eq!(bars[6].count, 3.0);
        assert_eq!(bars[6].percentage, 100.0);
        // 18:00 UTC + 5:30 -> 23:30, rounds to 24, wraps to 0
        assert_eq!(bars[0].count, 1.0);
        let total: f64 = bars.iter().map(|b| b.count).sum();
        assert_eq!(total, 4.0);
    }

    #[test]
    fn test_shift_hour_wraps_both_ways() {
        assert_eq!(shift_hour(5, 0), 5);
        assert_eq!(shift_hour(23, 60), 0);
        assert_eq!(shift_hour(0, -60), 23);
        assert_eq!(shift_hour(2, -330), 21);
        assert_eq!(shift_hour(12, 14 * 60), 2);
    }

    #[test]
    fn test_day_periods() {
        assert_eq!(DayPeriod::of_hour(4), DayPeriod::Night);
        assert_eq!(DayPeriod::of_hour(5), DayPeriod::Morning);
        assert_eq!(DayPeriod::of_hour(12), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::of_hour(18), DayPeriod::Evening);
        assert_eq!(DayPeriod::of_hour(22), DayPeriod::Night);
    }

    #[test]
    fn test_monthly_union_of_keys() {
        let activity = MonthlyActivity {
            commits: [("2024-01".to_string(), 10), ("2024-02".to_string(), 5)]
                .into_iter()
                .collect(),
            pull_requests: [("2024-03".to_string(), 2)].into_iter().collect(),
            code_changes: [(
                "2024-01".to_string(),
                LineChanges {
                    added: 75,
                    deleted: 25,
                },
            )]
            .into_iter()
            .collect(),
        };
        let bars = monthly_series(&activity);
        let months: Vec<&str> = bars.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);

        assert_eq!(bars[0].label, "Jan 24");
        assert_eq!(bars[0].commit_percentage, 100.0);
        assert_eq!(bars[1].commit_percentage, 50.0);
        assert_eq!(bars[0].change_percentage, 100.0);
        assert_eq!(bars[0].added_share, 0.75);
        assert_eq!(bars[0].deleted_share, 0.25);

        // No PRs in January, no code changes in February
        assert_eq!(bars[0].pr_percentage, 0.0);
        assert_eq!(bars[2].pr_percentage, 100.0);
        assert_eq!(bars[1].added_share, 0.0);
        assert_eq!(bars[1].change_percentage, 0.0);
    }

    #[test]
    fn test_monthly_empty() {
        let activity = MonthlyActivity {
            commits: BTreeMap::new(),
            pull_requests: BTreeMap::new(),
            code_changes: BTreeMap::new(),
        };
        assert!(monthly_series(&activity).is_empty());
    }

    #[test]
    fn test_series_max_of_empty_is_zero() {
        assert_eq!(series_max(Vec::<u64>::new()), 0);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }
}
