//! Progress Bar Module
//!
//! One style for every batch bar in the workspace: ████████▓░░░░░░░
//! Quiet mode (machine-readable output) swaps the draw target for a hidden one
//! so callers never need to branch.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub mod progress_style {
    /// indicatif wants three characters: filled, current, empty.
    pub const PROGRESS_CHARS: &str = "█▓░";

    pub const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

    pub const BATCH_TEMPLATE: &str = "{spinner:.green} {prefix:.cyan.bold} ▕{bar:35.green/black}▏ {percent:>3}% • {pos}/{len} • ⏱️ {elapsed_precise} (ETA: {eta}) • {msg}";
}

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

pub fn enable_quiet_mode() {
    QUIET_MODE.store(true, Ordering::Relaxed);
}

pub fn is_quiet_mode() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

fn batch_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(progress_style::BATCH_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(progress_style::PROGRESS_CHARS)
        .tick_chars(progress_style::SPINNER_CHARS)
}

/// Determinate bar for a batch. `total` may be 0 and grown later with
/// `set_length` once discovery has finished.
pub fn create_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if is_quiet_mode() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_style(batch_style());
        pb.set_prefix(prefix.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_template_is_valid() {
        assert!(ProgressStyle::default_bar()
            .template(progress_style::BATCH_TEMPLATE)
            .is_ok());
    }

    #[test]
    fn test_progress_bar_tracks_position() {
        let pb = create_progress_bar(0, "JPEG");
        pb.set_length(4);
        pb.set_position(3);
        assert_eq!(pb.position(), 3);
        assert_eq!(pb.length(), Some(4));
        pb.finish_and_clear();
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(75)), "1m 15s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 02m 05s");
    }
}
