use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use chrono::Local;

use nightsplit_core::NightWindow;
use nightsplit_export::RenameMarker;
use nightsplit_logging::{init_tracing, LogFormat, Logger};

mod config;
mod dates;
mod pipeline;

use config::ProjectConfig;
use pipeline::{Pipeline, RunOptions};

const DEFAULT_FILTER: &str = "HealthAutoExport-*.json";
const DEFAULT_PREFIX: &str = "Apple2Dreem";

#[derive(Parser, Debug)]
#[command(
    name = "nightsplit",
    about = "Split sleep-stage exports into per-night CSV summaries",
    version,
    author
)]
struct Cli {
    /// Input folder (default: current directory)
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Output folder (default: same as input folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Start of the date range (yyyy-MM-dd or yyyy-MM-dd-HH:mm)
    #[arg(short, long)]
    from: Option<String>,

    /// End of the date range (yyyy-MM-dd or yyyy-MM-dd-HH:mm)
    #[arg(short, long)]
    to: Option<String>,

    /// Input file filter (default: HealthAutoExport-*.json)
    #[arg(short = 'l', long)]
    filter: Option<String>,

    /// Time shift in seconds applied to every record (positive or negative)
    #[arg(short, long, allow_hyphen_values = true)]
    shift: Option<i64>,

    /// Prefix for output file names
    #[arg(long)]
    prefix: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatChoice,

    /// Also append every event as JSON to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long)]
    verbose: bool,

    /// Parse and summarize without writing or renaming anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format: LogFormat = cli.log_format.into();
    init_tracing(if cli.verbose { "debug" } else { "warn" }, log_format);

    let config = ProjectConfig::discover(&cli.input)?;
    let options = build_options(&cli, config);

    let logger = match cli.log_file {
        Some(ref path) => Logger::with_file(log_format, path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?,
        None => Logger::new(log_format),
    };

    let marker = RenameMarker::default();
    Pipeline::new(&options, &logger, &marker).run()?;

    Ok(())
}

/// Merge CLI flags over config values over defaults.
fn build_options(cli: &Cli, config: ProjectConfig) -> RunOptions {
    let window = NightWindow::default();
    let range = dates::resolve_range(
        cli.from.as_deref(),
        cli.to.as_deref(),
        &window,
        Local::now(),
    );

    RunOptions {
        input_dir: cli.input.clone(),
        output_dir: cli
            .output
            .clone()
            .or(config.output)
            .unwrap_or_else(|| cli.input.clone()),
        filter: cli
            .filter
            .clone()
            .or(config.filter)
            .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        prefix: cli
            .prefix
            .clone()
            .or(config.prefix)
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
        range,
        window,
        shift_seconds: cli.shift.or(config.shift).unwrap_or(0),
        dry_run: cli.dry_run,
    }
}
