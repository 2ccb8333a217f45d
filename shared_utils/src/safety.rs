//! Safety Module
//!
//! Detects output locations that overlap the source tree. Overlap is only
//! reported, never corrected: a second run over the same source will pick up
//! the JPEGs the first run wrote.

use std::path::{Path, PathBuf};

// Canonicalizes the longest existing ancestor so a not-yet-created output
// folder still compares against a canonical source path.
fn normalized(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => normalized(parent).join(name),
        _ => absolute,
    }
}

/// True when `inner` is `outer` itself or lives somewhere below it.
///
/// Paths are canonicalized when they exist, so `src/./out` and `src/out`
/// compare equal.
pub fn is_nested_within(inner: &Path, outer: &Path) -> bool {
    normalized(inner).starts_with(normalized(outer))
}

/// Warning text when the output tree overlaps the source tree, `None` otherwise.
pub fn check_output_location(source: &Path, output: &Path) -> Option<String> {
    if is_nested_within(output, source) {
        Some(format!(
            "Output folder '{}' is inside source folder '{}'; later runs will re-process generated JPEGs",
            output.display(),
            source.display()
        ))
    } else {
        None
    }
}
