use std::fs;

use chrono::DateTime;
use nightsplit_core::{summarize, Interval, Stage};
use nightsplit_export::{
    load_export, parse_export, render_night_csv, unique_path, write_night_csv, ExportError,
    IssueKind, ProcessedMarker, RenameMarker,
};
use tempfile::TempDir;

const SAMPLE_EXPORT: &str = r#"{"data":{"metrics":[{"name":"sleep_analysis","units":"hr","data":[
{"source":"Watch","qty":0.5,"startDate":"2024-01-15 19:00:00 +0100","value":"InBed","endDate":"2024-01-15 19:30:00 +0100"},
{"source":"Watch","qty":3.5,"startDate":"2024-01-15 19:30:00 +0100","value":"Core","endDate":"2024-01-15 23:00:00 +0100"},
{"source":"Watch","qty":0.08,"startDate":"2024-01-15 23:00:00 +0100","value":"Deep","endDate":"2024-01-15 23:05:00 +0100"},
{"source":"Watch","qty":0.5,"startDate":"2024-01-16 07:00:00 +0100","value":"Awake","endDate":"2024-01-16 07:30:00 +0100"}
]},{"name":"heart_rate","data":[]}]}}"#;

const HEADER: &str = "Type;Start Time;Stop Time;Sleep Duration;Sleep Onset Duration;Light Sleep Duration;Deep Sleep Duration;REM Duration;Wake After Sleep Onset Duration;Number of awakenings;Position Changes;Mean Heart Rate;Mean Respiration CPM;Number of Stimulations;Sleep efficiency;Hypnogram";

// ============================================================
// Parser tests
// ============================================================

#[test]
fn test_parse_sample_export() {
    let intervals = parse_export(SAMPLE_EXPORT).unwrap();

    assert_eq!(intervals.len(), 4);
    assert_eq!(intervals[0].source, "Watch");
    assert_eq!(intervals[0].stage(), Stage::Wake);
    assert_eq!(intervals[1].stage(), Stage::Light);
    assert_eq!(intervals[1].quantity, 3.5);
    assert_eq!(
        intervals[2].start,
        DateTime::parse_from_rfc3339("2024-01-15T23:00:00+01:00").unwrap()
    );
}

#[test]
fn test_missing_metrics_is_rejected() {
    let result = parse_export(r#"{"data":{}}"#);
    assert!(matches!(result, Err(ExportError::MissingHealthData)));

    let result = parse_export(r#"{}"#);
    assert!(matches!(result, Err(ExportError::MissingHealthData)));
}

#[test]
fn test_empty_metrics_is_rejected() {
    let result = parse_export(r#"{"data":{"metrics":[]}}"#);
    assert!(matches!(result, Err(ExportError::NoSleepData)));

    let result = parse_export(r#"{"data":{"metrics":[{"name":"sleep_analysis"}]}}"#);
    assert!(matches!(result, Err(ExportError::NoSleepData)));

    let result = parse_export(r#"{"data":{"metrics":[{"data":[]}]}}"#);
    assert!(matches!(result, Err(ExportError::NoEntries)));
}

#[test]
fn test_invalid_json_is_rejected() {
    assert!(matches!(parse_export(""), Err(ExportError::Json(_))));
    assert!(matches!(parse_export("{not json"), Err(ExportError::Json(_))));
}

#[test]
fn test_one_invalid_entry_rejects_file() {
    let json = r#"{"data":{"metrics":[{"data":[
{"source":"Watch","qty":1,"startDate":"2024-01-15 23:00:00 +0100","value":"Core","endDate":"2024-01-15 23:30:00 +0100"},
{"source":"Watch","qty":1,"startDate":"2024-01-15 23:30:00 +0100","endDate":"2024-01-15 23:45:00 +0100"}
]}]}}"#;

    match parse_export(json) {
        Err(ExportError::InvalidEntries(issues)) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].index, 1);
            assert_eq!(issues[0].kind, IssueKind::MissingStage);
        }
        other => panic!("expected InvalidEntries, got {:?}", other),
    }
}

#[test]
fn test_null_quantity_rejects_file() {
    let json = r#"{"data":{"metrics":[{"data":[
{"source":"Watch","qty":null,"startDate":"2024-01-15 23:00:00 +0100","value":"Core","endDate":"2024-01-15 23:30:00 +0100"}
]}]}}"#;

    match parse_export(json) {
        Err(ExportError::InvalidEntries(issues)) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].kind, IssueKind::InvalidQuantity);
        }
        other => panic!("expected InvalidEntries, got {:?}", other),
    }
}

#[test]
fn test_absent_quantity_defaults_to_zero() {
    let json = r#"{"data":{"metrics":[{"data":[
{"source":"Watch","startDate":"2024-01-15 23:00:00 +0100","value":"Core","endDate":"2024-01-15 23:30:00 +0100"}
]}]}}"#;

    let intervals = parse_export(json).unwrap();
    assert_eq!(intervals[0].quantity, 0.0);
}

#[test]
fn test_unparseable_date_does_not_abort() {
    let json = r#"{"data":{"metrics":[{"data":[
{"source":"Watch","qty":1,"startDate":"yesterday-ish","value":"Core","endDate":"2024-01-15 23:30:00 +0100"}
]}]}}"#;

    let intervals = parse_export(json).unwrap();
    assert_eq!(intervals.len(), 1);
    // replaced with the current time, which is well after the end date
    assert!(intervals[0].start > intervals[0].end);
}

#[test]
fn test_load_export_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("HealthAutoExport-2024-01-16.json");
    fs::write(&path, SAMPLE_EXPORT).unwrap();

    assert_eq!(load_export(&path).unwrap().len(), 4);
    assert!(matches!(
        load_export(&dir.path().join("missing.json")),
        Err(ExportError::Io(_))
    ));
}

// ============================================================
// CSV tests
// ============================================================

fn sample_summary() -> nightsplit_core::NightSummary {
    let intervals: Vec<Interval> = parse_export(SAMPLE_EXPORT).unwrap();
    summarize(&intervals, 0).unwrap()
}

#[test]
fn test_render_header_and_row() {
    let csv = render_night_csv(&sample_summary()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], HEADER);

    let fields: Vec<&str> = lines[1].split(';').collect();
    assert_eq!(fields.len(), 16);
    assert_eq!(
        &fields[..15],
        &[
            "night",
            "2024-01-15T19:00:00",
            "2024-01-16T07:30:00",
            "12:30:00",
            "0:30:00",
            "3:30:30",
            "0:05:00",
            "0:00:00",
            "8:24:30",
            "1",
            "0",
            "0",
            "0",
            "0",
            "0",
        ]
    );
    assert!(fields[15].starts_with("[WAKE,WAKE,"));
    assert!(fields[15].ends_with(",WAKE]"));
    assert_eq!(fields[15].matches("Deep").count(), 10);
}

#[test]
fn test_write_night_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("night.csv");

    write_night_csv(&path, &sample_summary()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(HEADER));
    assert_eq!(content, render_night_csv(&sample_summary()).unwrap());
}

// ============================================================
// Marker tests
// ============================================================

#[test]
fn test_rename_marker_prefixes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("HealthAutoExport-1.json");
    fs::write(&path, "{}").unwrap();

    let marked = RenameMarker::default().mark(&path).unwrap();

    assert_eq!(marked, dir.path().join("_HealthAutoExport-1.json"));
    assert!(marked.exists());
    assert!(!path.exists());
}

#[test]
fn test_rename_marker_disambiguates() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("_export.json"), "old").unwrap();
    fs::write(dir.path().join("_export_1.json"), "older").unwrap();

    let path = dir.path().join("export.json");
    fs::write(&path, "new").unwrap();

    let marked = RenameMarker::default().mark(&path).unwrap();

    assert_eq!(marked, dir.path().join("_export_2.json"));
    assert_eq!(fs::read_to_string(&marked).unwrap(), "new");
    assert_eq!(fs::read_to_string(dir.path().join("_export.json")).unwrap(), "old");
}

#[test]
fn test_unique_path_free_candidate() {
    let dir = TempDir::new().unwrap();
    let candidate = dir.path().join("_free.json");
    assert_eq!(unique_path(&candidate), candidate);
}

#[test]
fn test_mark_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let result = RenameMarker::default().mark(&dir.path().join("gone.json"));
    assert!(result.is_err());
}
