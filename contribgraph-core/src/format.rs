//! Display formatting for counts, hours and months
//!
//! All output is fixed English; nothing depends on the runtime locale.

use crate::calendar::month_abbreviation;
use crate::stats::parse_month_key;
use chrono::NaiveDateTime;

/// Compact line count: `1.2M`, `3.4K`, or the plain number below a thousand
pub fn format_line_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Group digits in threes: `12345` → `12,345`
pub fn format_thousands(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole counts print without a fraction; halved bi-hourly counts keep one digit
pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{:.0}", count)
    } else {
        format!("{:.1}", count)
    }
}

/// 12-hour clock label: `0` → `12AM`, `13` → `1PM`
pub fn format_hour(hour: u32) -> String {
    let suffix = if hour % 24 >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}{}", display, suffix)
}

/// `2024-03` → `Mar 24`; empty for keys that are not `YYYY-MM`
pub fn format_month_key(key: &str) -> String {
    match parse_month_key(key) {
        Some((year, month)) => format!(
            "{} {:02}",
            month_abbreviation(month),
            year.rem_euclid(100)
        ),
        None => String::new(),
    }
}

/// Long-form date such as `January 5, 2024`
pub fn format_generated_date(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%B %-d, %Y").to_string()
}
