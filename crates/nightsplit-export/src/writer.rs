use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate};
use nightsplit_core::{format_duration, NightSummary};
use serde::Serialize;
use tracing::debug;

use crate::ExportError;

pub const CSV_DELIMITER: u8 = b';';

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One row of the night CSV. Field names are the import format's headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRow {
    #[serde(rename = "Type")]
    pub kind: &'static str,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "Stop Time")]
    pub stop_time: String,
    #[serde(rename = "Sleep Duration")]
    pub sleep_duration: String,
    #[serde(rename = "Sleep Onset Duration")]
    pub sleep_onset_duration: String,
    #[serde(rename = "Light Sleep Duration")]
    pub light_sleep_duration: String,
    #[serde(rename = "Deep Sleep Duration")]
    pub deep_sleep_duration: String,
    #[serde(rename = "REM Duration")]
    pub rem_duration: String,
    #[serde(rename = "Wake After Sleep Onset Duration")]
    pub wake_after_sleep_onset_duration: String,
    #[serde(rename = "Number of awakenings")]
    pub awakenings: usize,
    #[serde(rename = "Position Changes")]
    pub position_changes: u32,
    #[serde(rename = "Mean Heart Rate")]
    pub mean_heart_rate: u32,
    #[serde(rename = "Mean Respiration CPM")]
    pub mean_respiration_cpm: u32,
    #[serde(rename = "Number of Stimulations")]
    pub stimulations: u32,
    #[serde(rename = "Sleep efficiency")]
    pub sleep_efficiency: u32,
    #[serde(rename = "Hypnogram")]
    pub hypnogram: String,
}

impl From<&NightSummary> for CsvRow {
    fn from(summary: &NightSummary) -> Self {
        Self {
            kind: "night",
            start_time: summary.start.format(TIME_FORMAT).to_string(),
            stop_time: summary.stop.format(TIME_FORMAT).to_string(),
            sleep_duration: format_duration(summary.total),
            sleep_onset_duration: format_duration(summary.sleep_onset),
            light_sleep_duration: format_duration(summary.light),
            deep_sleep_duration: format_duration(summary.deep),
            rem_duration: format_duration(summary.rem),
            wake_after_sleep_onset_duration: format_duration(summary.wake_after_sleep_onset),
            awakenings: summary.awakenings,
            position_changes: summary.position_changes,
            mean_heart_rate: summary.mean_heart_rate,
            mean_respiration_cpm: summary.mean_respiration_cpm,
            stimulations: summary.stimulations,
            sleep_efficiency: summary.sleep_efficiency,
            hypnogram: summary.hypnogram_string(),
        }
    }
}

/// `<prefix>_<YYYY-MM-DD>_<HH-MM>_<HH-MM>.csv`
pub fn output_file_name(
    prefix: &str,
    night: NaiveDate,
    segment_start: DateTime<FixedOffset>,
    segment_end: DateTime<FixedOffset>,
) -> String {
    format!(
        "{}_{}_{}_{}.csv",
        prefix,
        night.format("%Y-%m-%d"),
        segment_start.format("%H-%M"),
        segment_end.format("%H-%M")
    )
}

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(CSV_DELIMITER);
    builder
}

/// Render the header and data row as a string.
pub fn render_night_csv(summary: &NightSummary) -> Result<String, ExportError> {
    let mut writer = writer_builder().from_writer(Vec::new());
    writer.serialize(CsvRow::from(summary))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write the night's CSV to `path`, replacing any existing file.
pub fn write_night_csv(path: &Path, summary: &NightSummary) -> Result<(), ExportError> {
    let mut writer = writer_builder().from_path(path)?;
    writer.serialize(CsvRow::from(summary))?;
    writer.flush()?;
    debug!(path = %path.display(), "Wrote night CSV");
    Ok(())
}
