//! Intensity levels for heatmap cells
//!
//! Global invariants enforced:
//! - Zero counts always map to level 0
//! - Levels are monotonic in count for a fixed maximum
//! - A zero maximum never divides

use serde::Serialize;

/// Default heatmap colors, level 0 through level 4
const DEFAULT_COLORS: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];

/// Discrete color strength for a calendar cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum IntensityLevel {
    None,   // count == 0
    Low,    // ratio < 0.25
    Medium, // 0.25 <= ratio < 0.5
    High,   // 0.5 <= ratio < 0.75
    Peak,   // ratio >= 0.75
}

impl IntensityLevel {
    pub const ALL: [IntensityLevel; 5] = [
        IntensityLevel::None,
        IntensityLevel::Low,
        IntensityLevel::Medium,
        IntensityLevel::High,
        IntensityLevel::Peak,
    ];

    pub fn as_u8(self) -> u8 {
        match self {
            IntensityLevel::None => 0,
            IntensityLevel::Low => 1,
            IntensityLevel::Medium => 2,
            IntensityLevel::High => 3,
            IntensityLevel::Peak => 4,
        }
    }
}

impl From<IntensityLevel> for u8 {
    fn from(level: IntensityLevel) -> u8 {
        level.as_u8()
    }
}

/// Map a count to its intensity level relative to the dataset maximum
///
/// Levels 1 through 4 split the ratio at 0.25, 0.5 and 0.75. Each boundary
/// belongs to the upper level: a ratio of exactly 0.25 is level 2.
pub fn level(count: u64, max: u64) -> IntensityLevel {
    if count == 0 || max == 0 {
        return IntensityLevel::None;
    }
    // Quartile boundaries compared exactly: count/max < k/4 <=> 4*count < k*max
    let scaled = u128::from(count) * 4;
    let max = u128::from(max);
    if scaled < max {
        IntensityLevel::Low
    } else if scaled < 2 * max {
        IntensityLevel::Medium
    } else if scaled < 3 * max {
        IntensityLevel::High
    } else {
        IntensityLevel::Peak
    }
}

/// Levels shown in a heatmap legend, lightest first
pub fn legend(include_empty: bool) -> Vec<IntensityLevel> {
    let skip = if include_empty { 0 } else { 1 };
    IntensityLevel::ALL.iter().skip(skip).copied().collect()
}

/// One color per intensity level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    colors: [String; 5],
}

impl Palette {
    pub fn new(colors: [String; 5]) -> Self {
        Palette { colors }
    }

    pub fn color(&self, level: IntensityLevel) -> &str {
        &self.colors[level.as_u8() as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            colors: DEFAULT_COLORS.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_count_is_level_zero() {
        assert_eq!(level(0, 0), IntensityLevel::None);
        assert_eq!(level(0, 1), IntensityLevel::None);
        assert_eq!(level(0, 10_000), IntensityLevel::None);
    }

    #[test]
    fn test_max_count_is_peak() {
        for max in [1, 2, 7, 100, u64::MAX] {
            assert_eq!(level(max, max), IntensityLevel::Peak);
        }
    }

    #[test]
    fn test_boundaries_belong_to_upper_level() {
        assert_eq!(level(24, 100), IntensityLevel::Low);
        assert_eq!(level(25, 100), IntensityLevel::Medium);
        assert_eq!(level(49, 100), IntensityLevel::Medium);
        assert_eq!(level(50, 100), IntensityLevel::High);
        assert_eq!(level(74, 100), IntensityLevel::High);
        assert_eq!(level(75, 100), IntensityLevel::Peak);
        assert_eq!(level(1, 4), IntensityLevel::Medium);
    }

    #[test]
    fn test_boundaries_exact_for_large_counts() {
        let max = 1u64 << 60;
        assert_eq!(level(max / 4 - 1, max), IntensityLevel::Low);
        assert_eq!(level(max / 4, max), IntensityLevel::Medium);
        assert_eq!(level(max / 2 - 1, max), IntensityLevel::Medium);
        assert_eq!(level(max / 2, max), IntensityLevel::High);
        assert_eq!(level(max / 4 * 3 - 1, max), IntensityLevel::High);
        assert_eq!(level(max / 4 * 3, max), IntensityLevel::Peak);
        assert_eq!(level(u64::MAX - 1, u64::MAX), IntensityLevel::Peak);
        assert_eq!(level(1, u64::MAX), IntensityLevel::Low);
    }

    #[test]
    fn test_monotonic_in_count() {
        for max in [1u64, 3, 10, 37, 100] {
            let mut previous = IntensityLevel::None;
            for count in 0..=max {
                let current = level(count, max);
                assert!(
                    current >= previous,
                    "level({}, {}) = {:?} dropped below {:?}",
                    count,
                    max,
                    current,
                    previous
                );
                previous = current;
            }
        }
    }

    #[test]
    fn test_level_numbers() {
        let numbers: Vec<u8> = IntensityLevel::ALL.iter().map(|l| l.as_u8()).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
        assert_eq!(serde_json::to_string(&IntensityLevel::High).unwrap(), "3");
    }

    #[test]
    fn test_legend_variants() {
        assert_eq!(legend(true).len(), 5);
        let without_empty = legend(false);
        assert_eq!(without_empty.first(), Some(&IntensityLevel::Low));
        assert_eq!(without_empty.last(), Some(&IntensityLevel::Peak));
        assert_eq!(without_empty.len(), 4);
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.color(IntensityLevel::None), "#ebedf0");
        assert_eq!(palette.color(IntensityLevel::Peak), "#216e39");
    }
}
