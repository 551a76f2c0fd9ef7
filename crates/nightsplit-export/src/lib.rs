//! # nightsplit-export
//!
//! Reading sleep exports and writing per-night CSV files.
//!
//! ## Key Types
//!
//! - [`ExportDocument`] - Serde mirror of the export JSON
//! - [`ExportError`] - Why a file could not be read, parsed or written
//! - [`ProcessedMarker`] - Marks an input file as already converted
//!
//! ## Input Shape
//!
//! ```text
//! { "data": { "metrics": [ { "data": [
//!     {"source": "...", "qty": 1.0, "startDate": "...", "value": "Core", "endDate": "..."}
//! ] } ] } }
//! ```
//!
//! Only the first metric is read.

mod error;
mod marker;
mod parser;
mod timestamp;
mod types;
mod validate;
mod writer;

pub use error::{ExportError, MarkError};
pub use marker::{unique_path, ProcessedMarker, RenameMarker};
pub use parser::{load_export, parse_export};
pub use timestamp::{parse_timestamp, parse_timestamp_or_now};
pub use types::{ExportData, ExportDocument, Metric, RawRecord};
pub use validate::{validate_records, IssueKind, ValidationIssue};
pub use writer::{output_file_name, render_night_csv, write_night_csv, CsvRow, CSV_DELIMITER};
