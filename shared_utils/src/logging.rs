//! Logging setup
//!
//! Every run writes a daily-rolling file `{program}.{date}.log` (system temp
//! dir unless told otherwise) and echoes warnings to stderr. `RUST_LOG`
//! replaces the default filter. The appender itself prunes files beyond
//! `max_files`.
//!
//! ```no_run
//! use shared_utils::logging::{init_logging, LogConfig};
//!
//! init_logging("img_jpeg", LogConfig::default()).expect("logging");
//! tracing::info!("ready");
//! ```

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_SUFFIX: &str = "log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    /// Rolled files kept per program.
    pub max_files: usize,
    /// Applies to the program's own target and `shared_utils`.
    pub level: Level,
    pub stderr_level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: std::env::temp_dir(),
            max_files: 5,
            level: Level::INFO,
            stderr_level: Level::WARN,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.log_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_stderr_level(mut self, level: Level) -> Self {
        self.stderr_level = level;
        self
    }

    fn default_filter(&self, program_name: &str) -> String {
        format!("{program_name}={lvl},shared_utils={lvl}", lvl = self.level)
    }

    fn file_appender(&self, program_name: &str) -> Result<RollingFileAppender> {
        std::fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("cannot create log directory {}", self.log_dir.display()))?;

        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(program_name)
            .filename_suffix(LOG_SUFFIX)
            .max_log_files(self.max_files.max(1))
            .build(&self.log_dir)
            .with_context(|| format!("cannot open log file in {}", self.log_dir.display()))
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(program_name: &str, config: LogConfig) -> Result<()> {
    let appender = config.file_appender(program_name)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.default_filter(program_name)))
        .context("invalid log filter")?;

    let file_layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_thread_names(true)
        .with_line_number(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::from_level(config.stderr_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::debug!(
        program = program_name,
        log_dir = %config.log_dir.display(),
        keep = config.max_files,
        "logging ready"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.max_files, 5);
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.stderr_level, Level::WARN);
        assert_eq!(config.log_dir, std::env::temp_dir());
    }

    #[test]
    fn test_builder_overrides() {
        let dir = TempDir::new().unwrap();
        let config = LogConfig::new()
            .with_log_dir(dir.path())
            .with_level(Level::DEBUG)
            .with_stderr_level(Level::ERROR);

        assert_eq!(config.log_dir, dir.path());
        assert_eq!(config.max_files, 5);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.stderr_level, Level::ERROR);
    }

    #[test]
    fn test_default_filter_parses() {
        let config = LogConfig::new().with_level(Level::DEBUG);
        let filter = config.default_filter("img_jpeg");
        assert_eq!(filter, "img_jpeg=DEBUG,shared_utils=DEBUG");
        assert!(EnvFilter::try_new(filter).is_ok());
    }

    #[test]
    fn test_appender_writes_prefixed_file_in_new_dir() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let config = LogConfig::new().with_log_dir(&log_dir);

        let mut appender = config.file_appender("img_jpeg").unwrap();
        writeln!(appender, "hello").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = fs::read_dir(&log_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("img_jpeg."));
        assert!(names[0].ends_with(".log"));
    }

    #[test]
    fn test_unusable_log_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let config = LogConfig::new().with_log_dir(blocker.join("logs"));
        assert!(config.file_appender("img_jpeg").is_err());
    }
}
