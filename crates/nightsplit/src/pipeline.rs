//! Sequential conversion of export files into night CSVs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nightsplit_core::{group_nights, summarize, DateRange, NightGroup, NightWindow};
use nightsplit_export::{load_export, output_file_name, write_night_csv, ProcessedMarker};
use nightsplit_logging::{LogEvent, Logger};
use tracing::warn;

const DISPLAY_TIME: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Everything a run needs to know, after CLI and config are merged.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub filter: String,
    pub prefix: String,
    pub range: DateRange,
    pub window: NightWindow,
    pub shift_seconds: i64,
    pub dry_run: bool,
}

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub failed: usize,
    pub nights_written: usize,
}

/// Result of converting one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub outputs: Vec<PathBuf>,
    /// Where the input was moved to, if marking succeeded
    pub marked: Option<PathBuf>,
}

pub struct Pipeline<'a> {
    options: &'a RunOptions,
    logger: &'a Logger,
    marker: &'a dyn ProcessedMarker,
}

impl<'a> Pipeline<'a> {
    pub fn new(options: &'a RunOptions, logger: &'a Logger, marker: &'a dyn ProcessedMarker) -> Self {
        Self {
            options,
            logger,
            marker,
        }
    }

    /// Input files matching the filter, sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let dir = glob::Pattern::escape(&self.options.input_dir.to_string_lossy());
        let pattern = Path::new(&dir).join(&self.options.filter);
        let pattern = pattern.to_string_lossy();

        let mut files: Vec<PathBuf> = glob::glob(&pattern)
            .with_context(|| format!("Invalid file filter '{}'", self.options.filter))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Unreadable path while searching inputs: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();

        files.sort();
        Ok(files)
    }

    /// Process every matching file. Per-file failures are logged and counted,
    /// never returned.
    pub fn run(&self) -> Result<RunReport> {
        let options = self.options;

        self.logger.log(&LogEvent::RunStarted {
            input_dir: options.input_dir.clone(),
            output_dir: options.output_dir.clone(),
            filter: options.filter.clone(),
            from: options.range.from.format(DISPLAY_TIME).to_string(),
            to: options.range.to.format(DISPLAY_TIME).to_string(),
            shift_seconds: options.shift_seconds,
            dry_run: options.dry_run,
        });

        if !options.input_dir.is_dir() {
            self.logger.log(&LogEvent::InputMissing {
                input_dir: options.input_dir.clone(),
            });
            return Ok(RunReport::default());
        }

        if !options.dry_run {
            std::fs::create_dir_all(&options.output_dir).with_context(|| {
                format!(
                    "Failed to create output folder {}",
                    options.output_dir.display()
                )
            })?;
        }

        let files = self.discover()?;
        let mut report = RunReport::default();

        if files.is_empty() {
            self.logger.log(&LogEvent::NoInputFiles {
                input_dir: options.input_dir.clone(),
                filter: options.filter.clone(),
            });
            return Ok(report);
        }

        for path in &files {
            self.logger.log(&LogEvent::FileStarted { path: path.clone() });

            match self.process_file(path) {
                Ok(file) => {
                    report.processed += 1;
                    report.nights_written += file.outputs.len();
                }
                Err(e) => {
                    report.failed += 1;
                    self.logger.log(&LogEvent::FileSkipped {
                        path: path.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        self.logger.log(&LogEvent::RunCompleted {
            processed: report.processed,
            failed: report.failed,
            nights_written: report.nights_written,
        });

        Ok(report)
    }

    /// Parse, group, summarize and write one file, then mark it processed.
    ///
    /// A failed rename is logged but does not fail the file.
    pub fn process_file(&self, path: &Path) -> Result<FileReport> {
        let mut intervals = load_export(path)?;
        intervals.sort_by_key(|i| i.start);

        let nights = group_nights(&intervals, &self.options.window, &self.options.range);

        let mut outputs = Vec::with_capacity(nights.len());
        for night in &nights {
            outputs.push(self.write_night(night)?);
        }

        if self.options.dry_run {
            return Ok(FileReport {
                outputs,
                marked: None,
            });
        }

        let marked = match self.marker.mark(path) {
            Ok(to) => {
                self.logger.log(&LogEvent::FileMarked {
                    from: path.to_path_buf(),
                    to: to.clone(),
                });
                Some(to)
            }
            Err(e) => {
                warn!(path = %path.display(), "Unable to mark processed file: {}", e);
                self.logger.log(&LogEvent::MarkFailed {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                None
            }
        };

        Ok(FileReport { outputs, marked })
    }

    fn write_night(&self, night: &NightGroup) -> Result<PathBuf> {
        let (segment_start, segment_end) = night
            .segment_start()
            .zip(night.segment_end())
            .with_context(|| format!("Night of {} has no intervals", night.date))?;

        let summary = summarize(&night.intervals, self.options.shift_seconds)
            .with_context(|| format!("Failed to summarize night of {}", night.date))?;

        let date = night.date.format("%Y-%m-%d").to_string();
        self.logger.log(&LogEvent::NightSpan {
            night: date.clone(),
            start: summary.start.format(DISPLAY_TIME).to_string(),
            stop: summary.stop.format(DISPLAY_TIME).to_string(),
        });

        let name = output_file_name(&self.options.prefix, night.date, segment_start, segment_end);
        let output = self.options.output_dir.join(name);

        if !self.options.dry_run {
            write_night_csv(&output, &summary)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }

        self.logger.log(&LogEvent::NightWritten {
            night: date,
            segment_start: segment_start.format("%H:%M").to_string(),
            segment_end: segment_end.format("%H:%M").to_string(),
            output: output.clone(),
        });

        Ok(output)
    }
}
