//! Text and JSON output
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::calendar::DAYS_PER_WEEK;
use crate::dashboard::Dashboard;
use crate::format::{format_count, format_line_count, format_thousands};
use crate::intensity::IntensityLevel;
use anyhow::{Context, Result};

/// Width of a full-scale bar in text output
const BAR_WIDTH: usize = 30;

/// Width of one week column in the text heatmap
const WEEK_COLUMN_WIDTH: usize = 2;

const ROW_LABELS: [&str; DAYS_PER_WEEK] = ["", "Mon", "", "Wed", "", "Fri", ""];

/// Render a dashboard as pretty-printed JSON
pub fn render_json(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).context("failed to serialize dashboard to JSON")
}

/// Render a dashboard for the terminal
pub fn render_text(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} (generated {})\n",
        dashboard.title, dashboard.generated_on
    ));
    output.push_str(&format!(
        "Range: {} .. {}\n\n",
        dashboard.start_date, dashboard.end_date
    ));

    for card in &dashboard.summary {
        output.push_str(&format!(
            "{:<16} {:>10}  {}\n",
            card.title, card.value, card.description
        ));
    }

    output.push('\n');
    output.push_str(&render_text_calendar(dashboard));

    output.push_str(&format!(
        "\nWeekday pattern (most active on {})\n",
        dashboard.weekday.most_active
    ));
    for bar in &dashboard.weekday.bars {
        output.push_str(&format!(
            "{:<4} {:<width$} {}\n",
            bar.short_day,
            text_bar(bar.percentage),
            format_thousands(bar.count),
            width = BAR_WIDTH
        ));
    }

    output.push_str("\nTime of day\n");
    for bar in &dashboard.hourly {
        output.push_str(&format!(
            "{:<5} {:<width$} {}\n",
            bar.label,
            text_bar(bar.percentage),
            format_count(bar.count),
            width = BAR_WIDTH
        ));
    }

    if !dashboard.monthly.is_empty() {
        output.push_str("\nMonthly activity\n");
        output.push_str(&format!(
            "{:<8} {:>8} {:>6} {:>8} {:>8}\n",
            "MONTH", "COMMITS", "PRS", "ADDED", "DELETED"
        ));
        for bar in &dashboard.monthly {
            output.push_str(&format!(
                "{:<8} {:>8} {:>6} {:>8} {:>8}\n",
                bar.label,
                format_thousands(bar.commits),
                format_thousands(bar.pull_requests),
                format_line_count(bar.lines_added),
                format_line_count(bar.lines_deleted),
            ));
        }
    }

    output
}

/// Weekday rows by week columns, one glyph per intensity level
fn render_text_calendar(dashboard: &Dashboard) -> String {
    let view = &dashboard.calendar;
    let mut output = format!(
        "Contribution calendar ({} contributions)\n",
        format_thousands(view.total_contributions)
    );

    if view.grid.is_empty() {
        output.push_str("  no contributions recorded\n");
        return output;
    }

    // Month header: a label starts above its week column unless it would
    // overwrite the previous label.
    let mut header = String::from("     ");
    for label in &view.month_labels {
        let column = 5 + label.week_index * WEEK_COLUMN_WIDTH;
        if header.len() > column {
            continue;
        }
        while header.len() < column {
            header.push(' ');
        }
        header.push_str(label.month);
        header.push(' ');
    }
    output.push_str(header.trim_end());
    output.push('\n');

    for (day, row_label) in ROW_LABELS.iter().enumerate() {
        let mut line = format!("{:<4} ", row_label);
        for week in &view.grid.weeks {
            let cell = &week.cells[day];
            let glyph = if cell.is_filled() {
                level_glyph(cell.level())
            } else {
                ' '
            };
            line.push(glyph);
            line.push(' ');
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    let legend: Vec<String> = view
        .legend
        .iter()
        .map(|&level| level_glyph(level).to_string())
        .collect();
    output.push_str(&format!("     Less {} More\n", legend.join(" ")));

    output
}

fn level_glyph(level: IntensityLevel) -> char {
    match level {
        IntensityLevel::None => '·',
        IntensityLevel::Low => '░',
        IntensityLevel::Medium => '▒',
        IntensityLevel::High => '▓',
        IntensityLevel::Peak => '█',
    }
}

fn text_bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.min(BAR_WIDTH))
}
