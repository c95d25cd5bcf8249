//! HTML dashboard generation
//!
//! Generates a self-contained HTML page with embedded CSS and a small inline
//! script. The page works offline and needs no external assets.

use crate::charts::{DayPeriod, HourBar, MonthBar, WeekdaySeries};
use crate::config::ResolvedConfig;
use crate::dashboard::{CalendarView, Dashboard, SummaryCard};
use crate::format::{format_count, format_line_count, format_thousands};
use crate::intensity::{IntensityLevel, Palette};

/// Render a dashboard as a standalone HTML page
pub fn render_html(dashboard: &Dashboard, config: &ResolvedConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}{palette_css}</style>
</head>
<body>
    <div class="container">
        {header}
        {summary}
        {calendar}
        {weekday}
        {hourly}
        {monthly}
        {footer}
    </div>
    <script>{js}</script>
</body>
</html>"#,
        title = html_escape(&dashboard.title),
        css = inline_css(),
        palette_css = palette_css(&config.palette),
        js = inline_javascript(),
        header = render_header(dashboard),
        summary = render_summary(&dashboard.summary),
        calendar = render_calendar(&dashboard.calendar),
        weekday = render_weekday(&dashboard.weekday),
        hourly = render_hourly(&dashboard.hourly),
        monthly = render_monthly(&dashboard.monthly),
        footer = render_footer(dashboard),
    )
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
/* Reset & Base */
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #111827;
    background: #ffffff;
}

.container {
    max-width: 1200px;
    margin: 0 auto;
    padding: 2rem;
}

header {
    margin-bottom: 2rem;
    padding-bottom: 1rem;
    border-bottom: 2px solid #e5e7eb;
}

header h1 {
    font-size: 2rem;
    font-weight: 700;
    margin-bottom: 0.5rem;
}

header .meta, .muted {
    color: #6b7280;
    font-size: 0.875rem;
}

/* Summary */
.summary {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 1rem;
    margin-bottom: 2rem;
}

.summary-card {
    background: #f9fafb;
    padding: 1rem;
    border-radius: 0.5rem;
    border-left: 4px solid #216e39;
}

.summary-card h3 {
    font-size: 0.875rem;
    font-weight: 600;
    color: #6b7280;
    margin-bottom: 0.5rem;
}

.summary-card .value {
    font-size: 1.5rem;
    font-weight: 700;
}

/* Section */
.section {
    margin-bottom: 2.5rem;
}

.section h2 {
    font-size: 1.5rem;
    font-weight: 700;
    margin-bottom: 0.25rem;
}

.section .subtitle {
    color: #6b7280;
    font-size: 0.875rem;
    margin-bottom: 1rem;
}

/* Calendar */
.calendar {
    display: flex;
    align-items: flex-start;
    gap: 0.5rem;
}

.day-labels {
    display: grid;
    grid-template-rows: 1.25rem repeat(7, 14px);
    row-gap: 3px;
    font-size: 0.7rem;
    color: #6b7280;
    text-align: right;
}

.calendar-scroll {
    overflow-x: auto;
    padding-bottom: 0.5rem;
}

.month-labels {
    position: relative;
    height: 1.25rem;
    font-size: 0.7rem;
    color: #6b7280;
}

.month-labels span {
    position: absolute;
    top: 0;
}

.weeks {
    display: grid;
    grid-auto-flow: column;
    grid-template-rows: repeat(7, 14px);
    grid-auto-columns: 14px;
    gap: 3px;
}

.cell {
    width: 14px;
    height: 14px;
    border-radius: 3px;
}

.cell.empty {
    opacity: 0;
}

.legend {
    display: flex;
    justify-content: flex-end;
    align-items: center;
    gap: 0.3rem;
    font-size: 0.75rem;
    color: #6b7280;
    margin-top: 0.5rem;
}

.legend .cell {
    width: 12px;
    height: 12px;
}

/* Bar charts */
.bars {
    display: flex;
    align-items: flex-end;
    gap: 4px;
    height: 12rem;
}

.bar-column {
    flex: 1;
    display: flex;
    flex-direction: column;
    justify-content: flex-end;
    align-items: center;
    height: 100%;
}

.bar {
    width: 100%;
    border-radius: 4px 4px 0 0;
    background: #216e39;
    min-height: 1px;
}

.bar-label {
    font-size: 0.7rem;
    color: #6b7280;
    margin-top: 0.25rem;
    white-space: nowrap;
}

.bar-value {
    font-size: 0.75rem;
    font-weight: 600;
}

.period-morning { background: #f59e0b; }
.period-afternoon { background: #3b82f6; }
.period-evening { background: #8b5cf6; }
.period-night { background: #1e3a8a; }
.series-commits { background: #216e39; }
.series-prs { background: #3b82f6; }
.series-added { background: #22c55e; }
.series-deleted { background: #ef4444; }

.chart-legend {
    display: flex;
    justify-content: center;
    gap: 1rem;
    font-size: 0.75rem;
    margin-top: 0.75rem;
}

.chart-legend .swatch {
    display: inline-block;
    width: 12px;
    height: 12px;
    border-radius: 3px;
    margin-right: 0.25rem;
    vertical-align: middle;
}

.stacked {
    position: relative;
    width: 100%;
}

.stacked .bar {
    position: absolute;
    bottom: 0;
}

.pair {
    display: flex;
    width: 100%;
    gap: 2px;
    align-items: flex-end;
    height: 100%;
}

.pair .bar {
    flex: 1;
}

.empty-state {
    color: #6b7280;
    font-style: italic;
}

footer {
    margin-top: 3rem;
    padding-top: 1rem;
    border-top: 1px solid #e5e7eb;
    text-align: center;
    color: #6b7280;
    font-size: 0.875rem;
}

@media (max-width: 768px) {
    .container {
        padding: 1rem;
    }

    header h1 {
        font-size: 1.5rem;
    }

    .summary {
        grid-template-columns: 1fr;
    }
}
"#
}

/// Per-level cell colors from the configured palette
fn palette_css(palette: &Palette) -> String {
    IntensityLevel::ALL
        .iter()
        .map(|&level| {
            format!(
                ".level-{} {{ background: {}; }}\n",
                level.as_u8(),
                palette.color(level)
            )
        })
        .collect()
}

/// Scrolls the calendar to its most recent weeks on load
fn inline_javascript() -> &'static str {
    r#"
(function() {
    const scroller = document.querySelector('.calendar-scroll');
    if (scroller) {
        scroller.scrollLeft = scroller.scrollWidth;
    }
})();
"#
}

fn render_header(dashboard: &Dashboard) -> String {
    format!(
        r#"<header>
    <h1>{title}</h1>
    <div class="meta">
        <span>Range: {start} to {end}</span> •
        <span>Generated: {generated}</span>
    </div>
</header>"#,
        title = html_escape(&dashboard.title),
        start = dashboard.start_date,
        end = dashboard.end_date,
        generated = html_escape(&dashboard.generated_on),
    )
}

fn render_summary(cards: &[SummaryCard]) -> String {
    let cards: String = cards
        .iter()
        .map(|card| {
            format!(
                r#"
    <div class="summary-card">
        <h3>{title}</h3>
        <div class="value">{value}</div>
        <div class="muted">{description}</div>
    </div>"#,
                title = html_escape(card.title),
                value = html_escape(&card.value),
                description = html_escape(&card.description),
            )
        })
        .collect();

    format!(r#"<div class="summary">{}
</div>"#, cards)
}

/// Pixel distance between week columns (cell width + gap)
const WEEK_PITCH_PX: usize = 17;

fn render_calendar(view: &CalendarView) -> String {
    if view.grid.is_empty() {
        return r#"<section class="section" id="calendar">
    <h2>Contribution Calendar</h2>
    <p class="empty-state">No contributions recorded.</p>
</section>"#
            .to_string();
    }

    let month_labels: String = view
        .month_labels
        .iter()
        .map(|label| {
            format!(
                r#"<span style="left: {}px">{}</span>"#,
                label.week_index * WEEK_PITCH_PX,
                label.month
            )
        })
        .collect();

    let mut cells = String::new();
    for week in &view.grid.weeks {
        for cell in &week.cells {
            match cell.date() {
                Some(date) => cells.push_str(&format!(
                    r#"<div class="cell level-{level}" title="{date}: {count} contributions"></div>"#,
                    level = cell.level().as_u8(),
                    date = date,
                    count = format_thousands(cell.count()),
                )),
                None => cells.push_str(r#"<div class="cell empty"></div>"#),
            }
        }
    }

    let legend: String = view
        .legend
        .iter()
        .map(|level| format!(r#"<div class="cell level-{}"></div>"#, level.as_u8()))
        .collect();

    format!(
        r#"<section class="section" id="calendar">
    <h2>Contribution Calendar</h2>
    <p class="subtitle">{total} contributions</p>
    <div class="calendar">
        <div class="day-labels"><span></span><span></span><span>Mon</span><span></span><span>Wed</span><span></span><span>Fri</span><span></span></div>
        <div class="calendar-scroll">
            <div class="month-labels" style="width: {width}px">{month_labels}</div>
            <div class="weeks">{cells}</div>
        </div>
    </div>
    <div class="legend"><span>Less</span>{legend}<span>More</span></div>
</section>"#,
        total = format_thousands(view.total_contributions),
        width = view.grid.week_count() * WEEK_PITCH_PX,
        month_labels = month_labels,
        cells = cells,
        legend = legend,
    )
}

fn render_weekday(series: &WeekdaySeries) -> String {
    let columns: String = series
        .bars
        .iter()
        .map(|bar| {
            format!(
                r#"
        <div class="bar-column">
            <div class="bar-value">{count}</div>
            <div class="bar" style="height: {pct:.1}%"></div>
            <div class="bar-label">{day}</div>
        </div>"#,
                count = format_thousands(bar.count),
                pct = bar.percentage,
                day = bar.short_day,
            )
        })
        .collect();

    format!(
        r#"<section class="section" id="weekday">
    <h2>Weekday Pattern</h2>
    <p class="subtitle">Most active on {most_active}</p>
    <div class="bars">{columns}
    </div>
</section>"#,
        most_active = series.most_active,
        columns = columns,
    )
}

fn render_hourly(bars: &[HourBar]) -> String {
    let columns: String = bars
        .iter()
        .map(|bar| {
            let label = if bar.hour % 3 == 0 {
                bar.label.as_str()
            } else {
                ""
            };
            format!(
                r#"
        <div class="bar-column" title="{count} commits at {hour}">
            <div class="bar period-{period}" style="height: {pct:.1}%"></div>
            <div class="bar-label">{label}&nbsp;</div>
        </div>"#,
                count = format_count(bar.count),
                hour = bar.label,
                period = bar.period.as_str(),
                pct = bar.percentage,
                label = label,
            )
        })
        .collect();

    let legend: String = DayPeriod::ALL
        .iter()
        .map(|period| {
            format!(
                r#"<span><span class="swatch period-{}"></span>{}</span>"#,
                period.as_str(),
                period.legend_label()
            )
        })
        .collect();

    format!(
        r#"<section class="section" id="hourly">
    <h2>Time of Day</h2>
    <div class="bars">{columns}
    </div>
    <div class="chart-legend">{legend}</div>
</section>"#,
        columns = columns,
        legend = legend,
    )
}

fn render_monthly(bars: &[MonthBar]) -> String {
    if bars.is_empty() {
        return String::new();
    }

    let activity: String = bars
        .iter()
        .map(|bar| {
            format!(
                r#"
        <div class="bar-column">
            <div class="pair">
                <div class="bar series-commits" style="height: {commit_pct:.1}%" title="{commits} commits in {label}"></div>
                <div class="bar series-prs" style="height: {pr_pct:.1}%" title="{prs} PRs in {label}"></div>
            </div>
            <div class="bar-label">{label}</div>
        </div>"#,
                commit_pct = bar.commit_percentage,
                pr_pct = bar.pr_percentage,
                commits = format_thousands(bar.commits),
                prs = format_thousands(bar.pull_requests),
                label = html_escape(&bar.label),
            )
        })
        .collect();

    let changes: String = bars
        .iter()
        .map(|bar| {
            format!(
                r#"
        <div class="bar-column">
            <div class="stacked" style="height: {total_pct:.1}%" title="{added} added, {deleted} deleted in {label}">
                <div class="bar series-deleted" style="height: {deleted_pct:.1}%"></div>
                <div class="bar series-added" style="height: {added_pct:.1}%"></div>
            </div>
            <div class="bar-label">{label}</div>
        </div>"#,
                total_pct = bar.change_percentage,
                added = format_line_count(bar.lines_added),
                deleted = format_line_count(bar.lines_deleted),
                deleted_pct = bar.deleted_share * 100.0,
                added_pct = bar.added_share * 100.0,
                label = html_escape(&bar.label),
            )
        })
        .collect();

    format!(
        r#"<section class="section" id="monthly">
    <h2>Monthly Activity</h2>
    <p class="subtitle">Commits &amp; Pull Requests</p>
    <div class="bars">{activity}
    </div>
    <div class="chart-legend"><span><span class="swatch series-commits"></span>Commits</span><span><span class="swatch series-prs"></span>Pull Requests</span></div>
    <p class="subtitle">Code Changes</p>
    <div class="bars">{changes}
    </div>
    <div class="chart-legend"><span><span class="swatch series-added"></span>Lines Added</span><span><span class="swatch series-deleted"></span>Lines Deleted</span></div>
</section>"#,
        activity = activity,
        changes = changes,
    )
}

fn render_footer(dashboard: &Dashboard) -> String {
    format!(
        r#"<footer>
    <p>Data generated on {}</p>
</footer>"#,
        html_escape(&dashboard.generated_on)
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::build_dashboard;
    use crate::stats::GitStatsData;

    const STATS: &str = r#"{
        "generated_at": "2024-01-20T08:00:00Z",
        "date_range": { "start_date": "2024-01-07", "end_date": "2024-01-20" },
        "lifetime_stats": { "total_commits": 20, "total_prs": 3, "files_changed": 14 },
        "code_contribution": { "lines_added": 1500, "lines_deleted": 200 },
        "contribution_calendar": {
            "daily_commits": { "2024-01-07": 3, "2024-01-08": 5, "2024-01-16": 12 }
        },
        "monthly_activity": {
            "commits": { "2024-01": 20 },
            "pull_requests": { "2024-01": 3 },
            "code_changes": { "2024-01": { "added": 1500, "deleted": 200 } }
        },
        "weekday_activity": {
            "Monday": 5, "Tuesday": 12, "Wednesday": 0, "Thursday": 0,
            "Friday": 0, "Saturday": 0, "Sunday": 3
        },
        "hourly_activity": { "10": 12, "22": 8 }
    }"#;

    fn render(config: &ResolvedConfig) -> String {
        let data = GitStatsData::from_json(STATS).unwrap();
        let dashboard = build_dashboard(&data, config).unwrap();
        render_html(&dashboard, config)
    }

    #[test]
    fn test_page_structure() {
        let html = render(&ResolvedConfig::defaults().unwrap());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Contribution Dashboard</title>"));
        for id in ["calendar", "weekday", "hourly", "monthly"] {
            assert!(html.contains(&format!("id=\"{}\"", id)), "missing section {}", id);
        }
        assert!(html.contains("scrollLeft = scroller.scrollWidth"));
        assert!(html.contains("Data generated on January 20, 2024"));
    }

    #[test]
    fn test_calendar_cells() {
        let html = render(&ResolvedConfig::defaults().unwrap());
        assert!(html.contains(r#"title="2024-01-16: 12 contributions""#));
        assert!(html.contains(r#"<div class="cell level-4" title="2024-01-16"#));
        // Two weeks of seven cells; three filled
        assert_eq!(html.matches(r#"<div class="cell empty"></div>"#).count(), 11);
        assert!(html.contains("Most active on Tuesday"));
    }

    #[test]
    fn test_palette_and_legend_from_config() {
        let mut config = ResolvedConfig::defaults().unwrap();
        config.palette = Palette::new([
            "#000000".to_string(),
            "#111111".to_string(),
            "#222222".to_string(),
            "#333333".to_string(),
            "#444444".to_string(),
        ]);
        config.legend_includes_empty = false;
        let html = render(&config);
        assert!(html.contains(".level-3 { background: #333333; }"));
        assert!(html.contains(
            r#"<span>Less</span><div class="cell level-1"></div><div class="cell level-2"></div>"#
        ));
    }

    #[test]
    fn test_title_is_escaped() {
        let mut config = ResolvedConfig::defaults().unwrap();
        config.title = "<script>alert('x')</script>".to_string();
        let html = render(&config);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"q\""), "&quot;q&quot;");
    }
}
