use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Structured log events for a conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    RunStarted {
        input_dir: PathBuf,
        output_dir: PathBuf,
        filter: String,
        from: String,
        to: String,
        shift_seconds: i64,
        dry_run: bool,
    },
    InputMissing {
        input_dir: PathBuf,
    },
    NoInputFiles {
        input_dir: PathBuf,
        filter: String,
    },
    FileStarted {
        path: PathBuf,
    },
    /// Shifted start and stop of a night, before it is summarized
    NightSpan {
        night: String,
        start: String,
        stop: String,
    },
    NightWritten {
        night: String,
        segment_start: String,
        segment_end: String,
        output: PathBuf,
    },
    FileSkipped {
        path: PathBuf,
        reason: String,
    },
    FileMarked {
        from: PathBuf,
        to: PathBuf,
    },
    MarkFailed {
        path: PathBuf,
        error: String,
    },
    RunCompleted {
        processed: usize,
        failed: usize,
        nights_written: usize,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

/// Logger for run events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        match event {
            LogEvent::RunStarted {
                input_dir,
                output_dir,
                filter,
                from,
                to,
                shift_seconds,
                dry_run,
            } => {
                let _ = writeln!(stderr);
                let title = if *dry_run {
                    "nightsplit (dry run)"
                } else {
                    "nightsplit"
                };
                let _ = writeln!(stderr, "{}", title.bold().bright_white());
                let _ = writeln!(stderr, "  {} {}", "Input: ".dimmed(), input_dir.display());
                let _ = writeln!(stderr, "  {} {}", "Output:".dimmed(), output_dir.display());
                let _ = writeln!(stderr, "  {} {}", "Filter:".dimmed(), filter);
                let _ = writeln!(stderr, "  {} {} .. {}", "Range: ".dimmed(), from, to);
                let _ = writeln!(stderr, "  {} {}s", "Shift: ".dimmed(), shift_seconds);
                let _ = writeln!(stderr);
            }
            LogEvent::InputMissing { input_dir } => {
                let _ = writeln!(
                    stderr,
                    "{} Input folder '{}' does not exist",
                    "✗".bright_red(),
                    input_dir.display()
                );
            }
            LogEvent::NoInputFiles { filter, .. } => {
                let _ = writeln!(
                    stderr,
                    "{} No files found matching '{}'",
                    "⚠".bright_yellow(),
                    filter
                );
            }
            LogEvent::FileStarted { path } => {
                let _ = writeln!(
                    stderr,
                    "{} {}",
                    "▶".bright_cyan(),
                    path.display().to_string().bright_cyan().bold()
                );
            }
            LogEvent::NightSpan { .. } => {
                // Debug detail, only in json/compact and the log file
            }
            LogEvent::NightWritten {
                night,
                segment_start,
                segment_end,
                output,
            } => {
                let _ = writeln!(
                    stderr,
                    "    {} Night of {} ({} - {}) -> {}",
                    "✓".bright_green(),
                    night,
                    segment_start,
                    segment_end,
                    output.display().to_string().dimmed()
                );
            }
            LogEvent::FileSkipped { reason, .. } => {
                let _ = writeln!(
                    stderr,
                    "    {} Skipped: {}",
                    "✗".bright_red(),
                    reason.bright_red()
                );
            }
            LogEvent::FileMarked { to, .. } => {
                let _ = writeln!(
                    stderr,
                    "    {} {}",
                    "Renamed to".dimmed(),
                    to.display().to_string().dimmed()
                );
            }
            LogEvent::MarkFailed { error, .. } => {
                let _ = writeln!(
                    stderr,
                    "    {} Unable to rename processed file: {}",
                    "⚠".bright_yellow(),
                    error
                );
            }
            LogEvent::RunCompleted {
                processed,
                failed,
                nights_written,
            } => {
                let _ = writeln!(stderr);
                let failed_text = format!("{} failed", failed);
                let _ = writeln!(
                    stderr,
                    "Processing complete: {} processed, {}, {} nights",
                    processed.to_string().bright_green(),
                    if *failed > 0 {
                        failed_text.bright_red().to_string()
                    } else {
                        failed_text
                    },
                    nights_written
                );
            }
        }
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::RunStarted {
                input_dir, filter, ..
            } => format!("[{}] run:start {} {}", timestamp, input_dir.display(), filter),
            LogEvent::InputMissing { input_dir } => {
                format!("[{}] run:no-input {}", timestamp, input_dir.display())
            }
            LogEvent::NoInputFiles { filter, .. } => {
                format!("[{}] run:empty {}", timestamp, filter)
            }
            LogEvent::FileStarted { path } => {
                format!("[{}] file:start {}", timestamp, path.display())
            }
            LogEvent::NightSpan { night, start, stop } => {
                format!("[{}] night:span {} {}..{}", timestamp, night, start, stop)
            }
            LogEvent::NightWritten { night, output, .. } => {
                format!("[{}] night:done {} {}", timestamp, night, output.display())
            }
            LogEvent::FileSkipped { path, reason } => {
                format!("[{}] file:skip {} {}", timestamp, path.display(), reason)
            }
            LogEvent::FileMarked { to, .. } => {
                format!("[{}] file:marked {}", timestamp, to.display())
            }
            LogEvent::MarkFailed { path, error } => {
                format!("[{}] file:mark-failed {} {}", timestamp, path.display(), error)
            }
            LogEvent::RunCompleted {
                processed,
                failed,
                nights_written,
            } => format!(
                "[{}] run:done processed={} failed={} nights={}",
                timestamp, processed, failed, nights_written
            ),
        };
        let _ = writeln!(stderr, "{}", msg);
    }
}
