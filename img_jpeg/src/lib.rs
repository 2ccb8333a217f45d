//! img-jpeg - batch folder compressor
//!
//! Re-encodes every image under a source folder as a quality-controlled JPEG
//! in a mirrored output folder, reporting progress per file and collecting
//! per-file failures instead of stopping.
//!
//! ## Simple Mode
//! ```rust,no_run
//! use img_jpeg::{convert, Quality};
//! use std::path::Path;
//!
//! let result = convert(Path::new("photos"), Path::new("export"), Quality::DEFAULT, |p| {
//!     println!("{}/{}", p.completed, p.total);
//! });
//! println!("{} converted, {} failed", result.succeeded_count, result.failures.len());
//! ```

pub mod conversion_api;
pub mod errors;
pub mod quality;
pub mod settings;
pub mod worker;

pub use conversion_api::{convert, convert_file, ConversionRequest, ImageFileRef};
pub use errors::{ConvertError, PreconditionError, Result, RunError};
pub use quality::{Quality, QualityError};
pub use settings::RunSettings;
pub use worker::{ProgressSender, RunController, RunEvent, RunHandle, RunOutcome};

pub use shared_utils::{ConversionResult, FailureRecord, ProgressEvent};
