use clap::{Parser, ValueEnum};
use img_jpeg::{RunController, RunOutcome, RunSettings};
use shared_utils::logging::{init_logging, LogConfig};
use shared_utils::{
    completion_notification, crash_notification, create_progress_bar,
    missing_folders_notification, print_notification, print_summary_report, ConversionResult,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "img-jpeg")]
#[command(
    version,
    about = "Compress every image in a folder tree to JPEG, mirroring the tree in an output folder",
    long_about = None
)]
struct Cli {
    /// Folder to scan for images (searched recursively)
    #[arg(short, long, value_name = "SOURCE_DIR")]
    source: Option<PathBuf>,

    /// Folder that receives the JPEGs
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// JPEG quality 1-100; anything else falls back to 70
    #[arg(short, long, default_value = "70", allow_hyphen_values = true)]
    quality: String,

    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,

    #[arg(short, long)]
    verbose: bool,

    /// Where log files go (defaults to the system temp dir)
    #[arg(long, value_name = "LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default();
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.with_log_dir(dir);
    }
    if cli.verbose {
        log_config = log_config
            .with_level(Level::DEBUG)
            .with_stderr_level(Level::INFO);
    }
    if let Err(e) = init_logging("img_jpeg", log_config) {
        eprintln!("⚠️  Logging disabled: {:#}", e);
    }

    if cli.format == OutputFormat::Json {
        shared_utils::progress::enable_quiet_mode();
    }

    let settings = RunSettings::new(cli.source, cli.output, cli.quality);
    let request = match settings.to_request() {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Run not started");
            print_notification(&missing_folders_notification());
            std::process::exit(1);
        }
    };

    info!(
        source = ?request.source_root,
        output = ?request.output_root,
        quality = %request.quality,
        "Compression requested"
    );

    let controller = RunController::new();
    let start = Instant::now();
    let handle = controller.start(request)?;

    let pb = create_progress_bar(0, "JPEG");
    pb.set_message("Starting compression...");
    let outcome = handle.wait_with(|event| {
        pb.set_length(event.total as u64);
        pb.set_position(event.completed as u64);
        pb.set_message(format!(
            "Compressed {}/{} images...",
            event.completed, event.total
        ));
    });
    if let Some(total) = pb.length() {
        pb.set_position(total);
    }
    pb.finish_with_message("Compression finished.");

    match outcome {
        RunOutcome::Completed(result) => report(&result, cli.format, start)?,
        RunOutcome::Crashed(message) => {
            print_notification(&crash_notification(&message));
            std::process::exit(1);
        }
    }

    Ok(())
}

fn report(result: &ConversionResult, format: OutputFormat, start: Instant) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Human => {
            print_summary_report(result, start.elapsed(), "JPEG Compression");
            print_notification(&completion_notification(result));
        }
    }
    Ok(())
}
