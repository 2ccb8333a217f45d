//! Shared Utilities for the image folder compressor tools
//!
//! - Candidate discovery and the batch result accumulator
//! - Path helpers (extension matching, mirrored output paths)
//! - Output-inside-source detection
//! - Progress bar with ETA
//! - End-of-run notifications and summary report
//! - Logging setup (file + stderr)

pub mod batch;
pub mod common_utils;
pub mod logging;
pub mod progress;
pub mod report;
pub mod safety;

pub use batch::{
    collect_files, ConversionResult, FailureRecord, ProgressEvent, IMAGE_EXTENSIONS,
};
pub use common_utils::{get_extension_lowercase, has_extension, mirror_with_extension};
pub use progress::{create_progress_bar, format_duration};
pub use report::{
    completion_notification, crash_notification, missing_folders_notification,
    print_notification, print_summary_report, Notification, NotificationKind,
    MAX_LISTED_ERRORS,
};
pub use safety::{check_output_location, is_nested_within};
