//! Contribgraph core library - turns exported Git activity statistics into
//! calendar heatmaps and bar-chart series

// Global invariants enforced in this crate:
// - Every view is a pure function of the stats document and resolved config
// - No global mutable state
// - No randomness, clocks, threads, or async
// - Map iteration goes through BTreeMap so ordering is explicit
// - Identical input yields byte-for-byte identical output

pub mod calendar;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod html;
pub mod intensity;
pub mod report;
pub mod stats;

pub use calendar::{build_grid, label_months, CalendarGrid, DayCell, MonthLabel, WeekRow};
pub use config::ResolvedConfig;
pub use dashboard::{build_dashboard, Dashboard};
pub use error::StatsError;
pub use html::render_html;
pub use intensity::{level, IntensityLevel};
pub use report::{render_json, render_text};
pub use stats::{load_stats, GitStatsData};
