//! Contribgraph CLI - render Git contribution statistics as a dashboard

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output
// - Logs go to stderr; stdout carries only rendered output

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser, Subcommand};
use contribgraph_core::config::{self, ResolvedConfig};
use contribgraph_core::intensity::IntensityLevel;
use contribgraph_core::{build_dashboard, load_stats, render_html, render_json, render_text};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Default HTML file name, written beside the stats input
const DEFAULT_HTML_OUTPUT: &str = "contribgraph.html";

#[derive(Parser)]
#[command(name = "contribgraph")]
#[command(about = "Render Git contribution statistics as a calendar heatmap and activity charts")]
#[command(version = env!("CONTRIBGRAPH_VERSION"))]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease log verbosity (-q warn, -qq error)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a stats document as a dashboard
    Render {
        /// Path to the stats JSON document
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "html")]
        format: OutputFormat,

        /// Output file path (HTML default: contribgraph.html beside the input)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a stats document without rendering it
    Validate {
        /// Path to the stats JSON document
        path: PathBuf,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Html,
    Json,
    Text,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Render {
            path,
            format,
            output,
            config: config_path,
        } => {
            if !path.is_file() {
                anyhow::bail!("Stats file does not exist: {}", path.display());
            }

            let search_dir = input_dir(&path)?;
            let resolved = config::load_and_resolve(&search_dir, config_path.as_deref())
                .context("failed to load configuration")?;
            if let Some(config_path) = &resolved.config_path {
                eprintln!("Using config: {}", config_path.display());
            }

            let data = load_stats(&path)?;
            let dashboard = build_dashboard(&data, &resolved)
                .with_context(|| format!("invalid stats document: {}", path.display()))?;

            match format {
                OutputFormat::Html => {
                    let html = render_html(&dashboard, &resolved);
                    let output_path =
                        output.unwrap_or_else(|| search_dir.join(DEFAULT_HTML_OUTPUT));
                    write_output(&output_path, &html)?;
                    tracing::info!(path = %output_path.display(), "wrote HTML dashboard");
                    eprintln!("Dashboard written to: {}", output_path.display());
                }
                OutputFormat::Json => emit(output.as_deref(), &render_json(&dashboard)?)?,
                OutputFormat::Text => emit(output.as_deref(), &render_text(&dashboard))?,
            }
        }
        Commands::Validate { path } => {
            match load_stats(&path) {
                Ok(data) => {
                    println!("Stats valid: {}", path.display());
                    println!(
                        "  Range: {} .. {}",
                        data.date_range.start_date, data.date_range.end_date
                    );
                    println!(
                        "  Active days: {}",
                        data.contribution_calendar.daily_commits.len()
                    );
                    println!("  Months: {}", data.monthly_activity.commits.len());
                    println!("  Total commits: {}", data.lifetime_stats.total_commits);
                }
                Err(e) => {
                    eprintln!("Stats validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Title: {}", resolved.title);
    println!();
    println!("Hourly:");
    println!("  utc_offset_minutes: {}", resolved.hourly.utc_offset_minutes);
    println!("  bi_hourly: {}", resolved.hourly.bi_hourly);
    println!();
    println!("Palette:");
    for level in IntensityLevel::ALL {
        println!("  level {}: {}", level.as_u8(), resolved.palette.color(level));
    }
    println!();
    println!("Legend includes empty: {}", resolved.legend_includes_empty);
}

/// Directory holding the stats file; config discovery and the default
/// HTML output both resolve against it
fn input_dir(path: &Path) -> anyhow::Result<PathBuf> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => std::env::current_dir().context("failed to resolve current directory"),
    }
}

/// Print to stdout, or write to a file when a path is given
fn emit(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => write_output(path, content),
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

/// Write output to file with atomic write pattern
fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    use std::fs;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    // Temp + rename so a reader never sees a half-written file
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}
