use std::path::{Path, PathBuf};

use tracing::debug;

use crate::MarkError;

/// Records that an input file has been converted so later runs skip it.
pub trait ProcessedMarker {
    /// Mark `path` as processed, returning where the file now lives.
    fn mark(&self, path: &Path) -> Result<PathBuf, MarkError>;
}

/// Marks a file by renaming it with a prefix, so it no longer matches the
/// input filter.
#[derive(Debug, Clone)]
pub struct RenameMarker {
    prefix: String,
}

impl Default for RenameMarker {
    fn default() -> Self {
        Self::new("_")
    }
}

impl RenameMarker {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Name the file would be renamed to, before disambiguation.
    pub fn target(&self, path: &Path) -> Result<PathBuf, MarkError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MarkError::NoFileName(path.to_path_buf()))?;
        Ok(path.with_file_name(format!("{}{}", self.prefix, name)))
    }
}

impl ProcessedMarker for RenameMarker {
    fn mark(&self, path: &Path) -> Result<PathBuf, MarkError> {
        let target = unique_path(&self.target(path)?);

        std::fs::rename(path, &target).map_err(|source| MarkError::Rename {
            from: path.to_path_buf(),
            to: target.clone(),
            source,
        })?;

        debug!(from = %path.display(), to = %target.display(), "Marked file as processed");
        Ok(target)
    }
}

/// `candidate` if free, otherwise the first free `<stem>_<n>.<ext>` for
/// n = 1, 2, ...
pub fn unique_path(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut count = 1usize;
    loop {
        let next = candidate.with_file_name(format!("{}_{}{}", stem, count, extension));
        if !next.exists() {
            return next;
        }
        count += 1;
    }
}
