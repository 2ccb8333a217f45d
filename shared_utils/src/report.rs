//! Report Module
//!
//! End-of-run notifications and the summary box printed after a batch.

use crate::batch::ConversionResult;
use crate::progress::format_duration;
use console::style;
use std::fmt;
use std::time::Duration;

/// How many failure lines a completion warning lists before truncating.
pub const MAX_LISTED_ERRORS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Info => write!(f, "INFO"),
            NotificationKind::Warning => write!(f, "WARNING"),
            NotificationKind::Error => write!(f, "ERROR"),
        }
    }
}

/// A modal-style message shown once at the end of a run (or instead of one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn info(title: &str, body: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            title: title.to_string(),
            body: body.into(),
        }
    }

    pub fn warning(title: &str, body: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            title: title.to_string(),
            body: body.into(),
        }
    }

    pub fn error(title: &str, body: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.to_string(),
            body: body.into(),
        }
    }
}

/// Success message, or a warning listing the first few failures.
pub fn completion_notification(result: &ConversionResult) -> Notification {
    if !result.has_failures() {
        return Notification::info(
            "Done",
            format!(
                "Compression complete! {} images processed.",
                result.succeeded_count
            ),
        );
    }

    let listed: Vec<String> = result
        .failures
        .iter()
        .take(MAX_LISTED_ERRORS)
        .map(ToString::to_string)
        .collect();

    Notification::warning(
        "Completed with errors",
        format!(
            "Compressed {} images.\n{} errors occurred.\n\nFirst {} errors:\n{}",
            result.succeeded_count,
            result.failures.len(),
            MAX_LISTED_ERRORS,
            listed.join("\n")
        ),
    )
}

pub fn missing_folders_notification() -> Notification {
    Notification::error("Error", "Please select both folders.")
}

pub fn crash_notification(message: &str) -> Notification {
    Notification::error(
        "Error",
        format!("Compression stopped unexpectedly: {}", message),
    )
}

pub fn print_notification(notification: &Notification) {
    let header = match notification.kind {
        NotificationKind::Info => style(format!("✅ {}", notification.title)).green().bold(),
        NotificationKind::Warning => style(format!("⚠️  {}", notification.title))
            .yellow()
            .bold(),
        NotificationKind::Error => style(format!("❌ {}", notification.title)).red().bold(),
    };

    eprintln!();
    eprintln!("{}", header);
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for line in notification.body.lines() {
        eprintln!("   {}", line);
    }
}

pub fn print_summary_report(result: &ConversionResult, duration: Duration, operation_name: &str) {
    println!();
    println!("╔══════════════════════════════════════════════╗");
    println!("║  📊 {:<40} ║", format!("{} Summary", operation_name));
    println!("╠══════════════════════════════════════════════╣");
    println!("║  📁 Files Processed:    {:>10}           ║", result.total());
    println!(
        "║  ✅ Succeeded:          {:>10}           ║",
        result.succeeded_count
    );
    println!(
        "║  ❌ Failed:             {:>10}           ║",
        result.failures.len()
    );
    println!(
        "║  📈 Success Rate:       {:>9.1}%           ║",
        result.success_rate()
    );
    println!(
        "║  ⏱️  Total Time:         {:>10}           ║",
        format_duration(duration)
    );
    println!("╚══════════════════════════════════════════════╝");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_success_notification() {
        let mut result = ConversionResult::new();
        result.success();
        result.success();

        let n = completion_notification(&result);
        assert_eq!(n.kind, NotificationKind::Info);
        assert_eq!(n.title, "Done");
        assert_eq!(n.body, "Compression complete! 2 images processed.");
    }

    #[test]
    fn test_empty_run_is_a_success() {
        let n = completion_notification(&ConversionResult::new());
        assert_eq!(n.kind, NotificationKind::Info);
        assert!(n.body.contains("0 images processed"));
    }

    #[test]
    fn test_warning_lists_at_most_five_errors() {
        let mut result = ConversionResult::new();
        result.success();
        for i in 0..7 {
            result.fail(PathBuf::from(format!("bad{}.png", i)), "E".to_string());
        }

        let n = completion_notification(&result);
        assert_eq!(n.kind, NotificationKind::Warning);
        assert_eq!(n.title, "Completed with errors");
        assert!(n.body.starts_with("Compressed 1 images.\n7 errors occurred.\n\nFirst 5 errors:\n"));
        assert!(n.body.contains("Failed to compress bad0.png: E"));
        assert!(n.body.contains("Failed to compress bad4.png: E"));
        assert!(!n.body.contains("bad5.png"));
        assert_eq!(n.body.lines().filter(|l| l.starts_with("Failed")).count(), 5);
    }

    #[test]
    fn test_warning_with_fewer_errors_lists_all() {
        let mut result = ConversionResult::new();
        result.fail(PathBuf::from("a.png"), "E1".to_string());
        result.fail(PathBuf::from("b.png"), "E2".to_string());

        let n = completion_notification(&result);
        assert!(n.body.ends_with("Failed to compress a.png: E1\nFailed to compress b.png: E2"));
    }

    #[test]
    fn test_missing_folders_notification() {
        let n = missing_folders_notification();
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.body, "Please select both folders.");
    }

    #[test]
    fn test_crash_notification_carries_message() {
        let n = crash_notification("worker panicked");
        assert_eq!(n.kind, NotificationKind::Error);
        assert!(n.body.contains("worker panicked"));
    }
}
