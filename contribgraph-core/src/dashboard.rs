//! Dashboard assembly - derive every view from one validated stats document
//!
//! Global invariants enforced:
//! - Input is validated before any view is computed
//! - Views are derived fresh on every call, never cached
//! - Identical input yields identical output

use crate::calendar::{self, CalendarGrid, MonthLabel};
use crate::charts::{self, HourBar, MonthBar, WeekdaySeries};
use crate::config::ResolvedConfig;
use crate::error::StatsError;
use crate::format::{format_generated_date, format_line_count, format_thousands};
use crate::intensity::{self, IntensityLevel};
use crate::stats::GitStatsData;
use chrono::NaiveDate;
use serde::Serialize;

/// Headline figure shown above the charts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub description: String,
}

/// Calendar heatmap plus its annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub grid: CalendarGrid,
    pub month_labels: Vec<MonthLabel>,
    pub legend: Vec<IntensityLevel>,
    pub total_contributions: u64,
}

/// Everything a renderer needs, derived from one stats document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    /// Long-form generation date, e.g. `March 1, 2024`
    pub generated_on: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: Vec<SummaryCard>,
    pub calendar: CalendarView,
    pub weekday: WeekdaySeries,
    pub hourly: Vec<HourBar>,
    pub monthly: Vec<MonthBar>,
}

/// Build every dashboard view from a stats document
pub fn build_dashboard(
    data: &GitStatsData,
    config: &ResolvedConfig,
) -> Result<Dashboard, StatsError> {
    data.validate()?;

    let generated = data.generated_timestamp()?;
    let (start_date, end_date) = data.parsed_date_range()?;

    let grid = calendar::build_grid(&data.contribution_calendar.daily_commits)?;
    let month_labels = calendar::label_months(&grid);
    let total_contributions = grid.total_count();

    let dashboard = Dashboard {
        title: config.title.clone(),
        generated_on: format_generated_date(&generated),
        start_date,
        end_date,
        summary: summary_cards(data),
        calendar: CalendarView {
            grid,
            month_labels,
            legend: intensity::legend(config.legend_includes_empty),
            total_contributions,
        },
        weekday: charts::weekday_series(&data.weekday_activity),
        hourly: charts::hourly_series(&data.hourly_activity, &config.hourly),
        monthly: charts::monthly_series(&data.monthly_activity),
    };

    tracing::info!(
        weeks = dashboard.calendar.grid.week_count(),
        months = dashboard.monthly.len(),
        most_active = dashboard.weekday.most_active,
        "built dashboard"
    );

    Ok(dashboard)
}

fn summary_cards(data: &GitStatsData) -> Vec<SummaryCard> {
    let lifetime = &data.lifetime_stats;
    let code = &data.code_contribution;

    vec![
        SummaryCard {
            title: "Total Commits",
            value: format_thousands(lifetime.total_commits),
            description: "Lifetime commits contributed".to_string(),
        },
        SummaryCard {
            title: "Total PRs",
            value: format_thousands(lifetime.total_prs),
            description: "Pull requests created".to_string(),
        },
        SummaryCard {
            title: "Lines Changed",
            value: format_line_count(code.lines_added.saturating_add(code.lines_deleted)),
            description: format!(
                "{} added, {} deleted",
                format_line_count(code.lines_added),
                format_line_count(code.lines_deleted)
            ),
        },
        SummaryCard {
            title: "Files Changed",
            value: format_thousands(lifetime.files_changed),
            description: "Files touched across all commits".to_string(),
        },
    ]
}
