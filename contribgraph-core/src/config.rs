//! Configuration file support for contribgraph
//!
//! Loads presentation settings from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.contribgraphrc.json` next to the stats file
//! 3. `contribgraph.config.json` next to the stats file
//! 4. `"contribgraph"` key in `package.json`
//!
//! All fields are optional. Config never changes how counts are bucketed
//! into the calendar grid; it only picks between presentation variants.

use crate::charts::HourlyPolicy;
use crate::intensity::Palette;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TITLE: &str = "Contribution Dashboard";

/// Largest UTC offset in use anywhere (UTC+14 / UTC-12, with margin)
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// contribgraph configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContribgraphConfig {
    /// Page title for HTML output (default: "Contribution Dashboard")
    #[serde(default)]
    pub title: Option<String>,

    /// How hourly activity buckets are interpreted
    #[serde(default)]
    pub hourly: Option<HourlyConfig>,

    /// Heatmap colors, one per intensity level
    #[serde(default)]
    pub palette: Option<PaletteConfig>,

    /// Show the level-0 swatch in the calendar legend (default: true)
    #[serde(default)]
    pub legend_includes_empty: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HourlyConfig {
    /// Minutes added to every hour key before display (default: 0)
    pub utc_offset_minutes: Option<i32>,
    /// Halve counts, treating each bucket as two hours (default: false)
    pub bi_hourly: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteConfig {
    /// Exactly five `#rgb` or `#rrggbb` colors, level 0 first
    pub levels: Vec<String>,
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub title: String,
    pub hourly: HourlyPolicy,
    pub palette: Palette,
    pub legend_includes_empty: bool,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl ContribgraphConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                anyhow::bail!("title must not be empty");
            }
        }

        if let Some(ref hourly) = self.hourly {
            if let Some(offset) = hourly.utc_offset_minutes {
                if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&offset) {
                    anyhow::bail!(
                        "hourly.utc_offset_minutes must be within ±{} (got {})",
                        MAX_OFFSET_MINUTES,
                        offset
                    );
                }
            }
        }

        if let Some(ref palette) = self.palette {
            if palette.levels.len() != 5 {
                anyhow::bail!(
                    "palette.levels must have exactly 5 colors (got {})",
                    palette.levels.len()
                );
            }
            for color in &palette.levels {
                if !is_hex_color(color) {
                    anyhow::bail!("palette.levels: invalid color {:?}", color);
                }
            }
        }

        Ok(())
    }

    /// Resolve config into the form used when rendering
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let hourly = match &self.hourly {
            Some(h) => HourlyPolicy {
                utc_offset_minutes: h.utc_offset_minutes.unwrap_or(0),
                bi_hourly: h.bi_hourly.unwrap_or(false),
            },
            None => HourlyPolicy::default(),
        };

        let palette = match &self.palette {
            Some(p) => {
                let colors: [String; 5] = p
                    .levels
                    .clone()
                    .try_into()
                    .map_err(|_| anyhow::anyhow!("palette.levels must have exactly 5 colors"))?;
                Palette::new(colors)
            }
            None => Palette::default(),
        };

        Ok(ResolvedConfig {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            hourly,
            palette,
            legend_includes_empty: self.legend_includes_empty.unwrap_or(true),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        ContribgraphConfig::default().resolve()
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Discover and load a config file from a directory
///
/// Search order:
/// 1. `.contribgraphrc.json`
/// 2. `contribgraph.config.json`
/// 3. `"contribgraph"` key in `package.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(ContribgraphConfig, PathBuf)>> {
    for name in [".contribgraphrc.json", "contribgraph.config.json"] {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    let pkg_path = dir.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<ContribgraphConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: ContribgraphConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load config from the "contribgraph" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<ContribgraphConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("contribgraph") {
        Some(value) => {
            let config: ContribgraphConfig = serde_json::from_value(value.clone())
                .with_context(|| format!("invalid contribgraph config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid contribgraph config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `search_dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(search_dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(search_dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (ContribgraphConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    match &source_path {
        Some(path) => tracing::debug!(path = %path.display(), "using config file"),
        None => tracing::debug!(dir = %search_dir.display(), "no config file found, using defaults"),
    }
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intensity::IntensityLevel;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = ContribgraphConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.title, "Contribution Dashboard");
        assert_eq!(resolved.hourly, HourlyPolicy::default());
        assert_eq!(resolved.palette, Palette::default());
        assert!(resolved.legend_includes_empty);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: ContribgraphConfig = serde_json::from_str("{}").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let json = r##"{
            "title": "My Year in Commits",
            "hourly": { "utc_offset_minutes": 330, "bi_hourly": true },
            "palette": { "levels": ["#fff", "#c6e48b", "#7bc96f", "#239a3b", "#196127"] },
            "legend_includes_empty": false
        }"##;
        let config: ContribgraphConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.title, "My Year in Commits");
        assert_eq!(resolved.hourly.utc_offset_minutes, 330);
        assert!(resolved.hourly.bi_hourly);
        assert_eq!(resolved.palette.color(IntensityLevel::Low), "#c6e48b");
        assert!(!resolved.legend_includes_empty);
    }

    #[test]
    fn test_partial_hourly_uses_defaults_for_rest() {
        let json = r#"{"hourly": {"bi_hourly": true}}"#;
        let config: ContribgraphConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert!(resolved.hourly.bi_hourly);
        assert_eq!(resolved.hourly.utc_offset_minutes, 0);
    }

    #[test]
    fn test_reject_unknown_fields() {
        let result: Result<ContribgraphConfig, _> = serde_json::from_str(r#"{"theme": "dark"}"#);
        assert!(result.is_err(), "unknown fields should be rejected");
        let result: Result<ContribgraphConfig, _> =
            serde_json::from_str(r#"{"hourly": {"timezone": "IST"}}"#);
        assert!(result.is_err(), "unknown nested fields should be rejected");
    }

    #[test]
    fn test_reject_out_of_range_offset() {
        let json = r#"{"hourly": {"utc_offset_minutes": 900}}"#;
        let config: ContribgraphConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());

        for offset in [i32::MIN, i32::MAX, -841, 841] {
            let json = format!(r#"{{"hourly": {{"utc_offset_minutes": {}}}}}"#, offset);
            let config: ContribgraphConfig = serde_json::from_str(&json).unwrap();
            assert!(config.validate().is_err(), "offset {} should be rejected", offset);
        }
        for offset in [-840, 0, 840] {
            let json = format!(r#"{{"hourly": {{"utc_offset_minutes": {}}}}}"#, offset);
            let config: ContribgraphConfig = serde_json::from_str(&json).unwrap();
            assert!(config.validate().is_ok(), "offset {} should be accepted", offset);
        }
    }

    #[test]
    fn test_reject_wrong_palette_length() {
        let json = r##"{"palette": {"levels": ["#fff", "#000"]}}"##;
        let config: ContribgraphConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_invalid_palette_color() {
        let json = r##"{"palette": {"levels": ["#fff", "#000", "red", "#123456", "#abc"]}}"##;
        let config: ContribgraphConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_blank_title() {
        let config: ContribgraphConfig = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".contribgraphrc.json");
        fs::write(&config_path, r#"{"title": "From rc"}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.title.as_deref(), Some("From rc"));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("contribgraph.config.json"),
            r#"{"legend_includes_empty": false}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.legend_includes_empty, Some(false));
    }

    #[test]
    fn test_discover_package_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
            "name": "portfolio",
            "version": "1.0.0",
            "contribgraph": { "hourly": { "utc_offset_minutes": 330 } }
        }"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            config.hourly.and_then(|h| h.utc_offset_minutes),
            Some(330)
        );
    }

    #[test]
    fn test_package_json_without_key() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "portfolio"}"#).unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".contribgraphrc.json"), r#"{"title": "rc"}"#).unwrap();
        fs::write(
            dir.path().join("contribgraph.config.json"),
            r#"{"title": "config"}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            config.title.as_deref(),
            Some("rc"),
            ".contribgraphrc.json should take priority"
        );
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.title, "Contribution Dashboard");
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"hourly": {"bi_hourly": true}}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert!(resolved.hourly.bi_hourly);
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_invalid_config_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".contribgraphrc.json");
        fs::write(&config_path, r#"{"hourly": {"utc_offset_minutes": -2000}}"#).unwrap();

        let err = load_and_resolve(dir.path(), None).unwrap_err();
        assert!(format!("{:#}", err).contains(".contribgraphrc.json"));
    }
}
