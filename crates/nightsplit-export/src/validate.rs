use std::fmt;

use tracing::warn;

use crate::RawRecord;

/// What is wrong with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    MissingDate,
    MissingStage,
    InvalidQuantity,
    MissingSource,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IssueKind::MissingDate => "start or end date is missing",
            IssueKind::MissingStage => "sleep stage value is missing",
            IssueKind::InvalidQuantity => "invalid quantity value",
            IssueKind::MissingSource => "source is missing",
        };
        f.write_str(text)
    }
}

/// A structural problem found in the record at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub index: usize,
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {}: {}", self.index, self.kind)
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

/// Check every record and report all issues. An empty result means the
/// whole file may be processed.
pub fn validate_records(records: &[RawRecord]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let mut push = |kind| issues.push(ValidationIssue { index, kind });

        if is_blank(&record.start_date) || is_blank(&record.end_date) {
            push(IssueKind::MissingDate);
        }
        if is_blank(&record.value) {
            push(IssueKind::MissingStage);
        }
        if record.quantity().is_none() {
            push(IssueKind::InvalidQuantity);
        }
        if is_blank(&record.source) {
            push(IssueKind::MissingSource);
        }
    }

    for issue in &issues {
        warn!(%issue, "Invalid sleep entry");
    }

    issues
}
