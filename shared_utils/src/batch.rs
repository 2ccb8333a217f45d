//! Batch Processing Module
//!
//! Candidate discovery for batch runs and the result accumulator that every
//! batch returns. Discovery finishes before the caller writes anything, so a
//! run never picks up files it produced itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Input extensions accepted by the JPEG compressor (compared lower-cased).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "tiff", "tif", "gif"];

/// Collects every file under `dir` whose extension is in `extensions`.
///
/// Order is whatever the filesystem walk yields; it is not sorted. Entries the
/// walk cannot read are logged and skipped, and a missing `dir` yields an
/// empty list. Symlinked directories are not descended into; any other
/// symlink is kept, dangling ones included, so the caller reports them as
/// unreadable instead of losing them.
pub fn collect_files(dir: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(root = ?dir, error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(is_file_candidate)
        .filter(|e| crate::common_utils::has_extension(e.path(), extensions))
        .map(DirEntry::into_path)
        .collect()
}

fn is_file_candidate(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

/// One attempted file, reported after it either succeeded or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 1-based count of files attempted so far.
    pub completed: usize,
    pub total: usize,
}

impl ProgressEvent {
    pub fn is_last(&self) -> bool {
        self.completed == self.total
    }
}

/// A file the batch could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub source_path: PathBuf,
    pub message: String,
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to compress {}: {}",
            self.source_path.display(),
            self.message
        )
    }
}

/// Outcome of one batch run.
///
/// `succeeded_count + failures.len()` always equals the number of candidates
/// the run attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub succeeded_count: usize,
    pub failures: Vec<FailureRecord>,
}

impl ConversionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self) {
        self.succeeded_count += 1;
    }

    pub fn fail(&mut self, source_path: PathBuf, message: String) {
        self.failures.push(FailureRecord {
            source_path,
            message,
        });
    }

    pub fn total(&self) -> usize {
        self.succeeded_count + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            100.0
        } else {
            (self.succeeded_count as f64 / total as f64) * 100.0
        }
    }

    /// Human-readable failure lines, in the order the failures happened.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}
