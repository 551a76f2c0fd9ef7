use std::path::Path;

use nightsplit_core::Interval;
use tracing::debug;

use crate::{parse_timestamp_or_now, validate_records, ExportDocument, ExportError, RawRecord};

/// Read and parse an export file into intervals.
pub fn load_export(path: &Path) -> Result<Vec<Interval>, ExportError> {
    let content = std::fs::read_to_string(path)?;
    let intervals = parse_export(&content)?;
    debug!(path = %path.display(), intervals = intervals.len(), "Loaded export");
    Ok(intervals)
}

/// Parse export JSON into intervals.
///
/// Fails if the document lacks the expected structure or if any record is
/// structurally invalid. Unparseable dates do not fail; they are replaced by
/// the current time.
pub fn parse_export(json: &str) -> Result<Vec<Interval>, ExportError> {
    let document: ExportDocument = serde_json::from_str(json)?;

    let metrics = document
        .data
        .and_then(|d| d.metrics)
        .ok_or(ExportError::MissingHealthData)?;

    let records = metrics
        .into_iter()
        .next()
        .and_then(|m| m.data)
        .ok_or(ExportError::NoSleepData)?;

    if records.is_empty() {
        return Err(ExportError::NoEntries);
    }

    let issues = validate_records(&records);
    if !issues.is_empty() {
        return Err(ExportError::InvalidEntries(issues));
    }

    Ok(records.iter().map(to_interval).collect())
}

fn to_interval(record: &RawRecord) -> Interval {
    Interval::new(
        record.source.clone().unwrap_or_default(),
        record.quantity().unwrap_or_default(),
        parse_timestamp_or_now(record.start_date.as_deref().unwrap_or_default()),
        parse_timestamp_or_now(record.end_date.as_deref().unwrap_or_default()),
        record.value.clone().unwrap_or_default(),
    )
}
