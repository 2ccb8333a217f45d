//! Batch JPEG conversion API
//!
//! Walks a source tree and re-encodes every candidate image as JPEG under the
//! mirrored path in the output tree:
//!
//! ```text
//! source/a.png        ->  output/a.jpg
//! source/sub/b.webp   ->  output/sub/b.jpg
//! ```
//!
//! One file failing never stops the batch. Every attempted file, successful or
//! not, produces exactly one progress event.

use crate::errors::{ConvertError, Result};
use crate::quality::Quality;
use image::{ColorType, DynamicImage, GrayImage, ImageReader, RgbImage};
use jpeg_encoder::{ColorType as JpegColorType, Encoder};
use shared_utils::common_utils::{mirror_with_extension, panic_message, relative_to};
use shared_utils::{
    check_output_location, collect_files, ConversionResult, ProgressEvent, IMAGE_EXTENSIONS,
};
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const OUTPUT_EXTENSION: &str = "jpg";

/// Parameters for one run, fixed for its whole duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub quality: Quality,
}

impl ConversionRequest {
    pub fn new(
        source_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        quality: Quality,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            quality,
        }
    }

    pub fn run<F>(self, on_progress: F) -> ConversionResult
    where
        F: FnMut(ProgressEvent),
    {
        convert(&self.source_root, &self.output_root, self.quality, on_progress)
    }
}

/// A discovered candidate and its position inside the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFileRef {
    path: PathBuf,
    relative: PathBuf,
}

impl ImageFileRef {
    pub fn new(source_root: &Path, path: PathBuf) -> Result<Self> {
        let relative = relative_to(source_root, &path)
            .ok_or_else(|| ConvertError::OutsideSourceRoot {
                root: source_root.to_path_buf(),
            })?
            .to_path_buf();
        Ok(Self { path, relative })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }

    pub fn destination(&self, output_root: &Path) -> PathBuf {
        mirror_with_extension(output_root, &self.relative, OUTPUT_EXTENSION)
    }
}

/// Pixel layouts the JPEG encoder accepts. Alpha and palettes never get here.
enum JpegPixels {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl JpegPixels {
    /// Grayscale stays grayscale; everything else, including every
    /// alpha-carrying layout, becomes 8-bit RGB with the alpha dropped.
    fn from_image(img: DynamicImage) -> Self {
        match img.color() {
            ColorType::L8 | ColorType::L16 => JpegPixels::Gray(img.into_luma8()),
            _ => JpegPixels::Rgb(img.into_rgb8()),
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        match self {
            JpegPixels::Gray(img) => img.dimensions(),
            JpegPixels::Rgb(img) => img.dimensions(),
        }
    }

    fn encode(&self, quality: Quality) -> Result<Vec<u8>> {
        let (width, height) = self.dimensions();
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(ConvertError::Dimensions { width, height });
        };

        let mut buf = Vec::new();
        let mut encoder = Encoder::new(&mut buf, quality.value());
        encoder.set_optimized_huffman_tables(true);

        match self {
            JpegPixels::Gray(img) => encoder.encode(img.as_raw(), w, h, JpegColorType::Luma)?,
            JpegPixels::Rgb(img) => encoder.encode(img.as_raw(), w, h, JpegColorType::Rgb)?,
        }
        Ok(buf)
    }
}

fn decode(path: &Path) -> Result<DynamicImage> {
    // Content sniffing first, so a JPEG saved as .png still decodes.
    let reader = ImageReader::open(path)
        .map_err(ConvertError::Read)?
        .with_guessed_format()
        .map_err(ConvertError::Read)?;
    Ok(reader.decode()?)
}

/// Converts one candidate and returns the path of the JPEG written.
pub fn convert_file(
    source_root: &Path,
    output_root: &Path,
    path: &Path,
    quality: Quality,
) -> Result<PathBuf> {
    let file = ImageFileRef::new(source_root, path.to_path_buf())?;
    let destination = file.destination(output_root);

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|source| ConvertError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let img = decode(file.path())?;
    if img.color().has_alpha() {
        debug!(path = ?file.path(), color = ?img.color(), "Dropping alpha channel for JPEG output");
    }

    let bytes = JpegPixels::from_image(img).encode(quality)?;
    fs::write(&destination, bytes).map_err(|source| ConvertError::Write {
        path: destination.clone(),
        source,
    })?;

    Ok(destination)
}

// Panics from the codecs become an ordinary per-file failure.
fn guarded<T>(op: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(op))
        .unwrap_or_else(|payload| Err(ConvertError::Unexpected(panic_message(&*payload))))
}

/// Converts every candidate under `source_root` into `output_root`.
///
/// `on_progress` is called once per attempted file, after the attempt. With
/// no candidates it is never called.
pub fn convert<F>(
    source_root: &Path,
    output_root: &Path,
    quality: Quality,
    mut on_progress: F,
) -> ConversionResult
where
    F: FnMut(ProgressEvent),
{
    if let Some(warning) = check_output_location(source_root, output_root) {
        warn!("{}", warning);
    }

    let candidates = if source_root.is_dir() {
        collect_files(source_root, IMAGE_EXTENSIONS, true)
    } else {
        warn!(source = ?source_root, "Source folder does not exist or is not a directory");
        Vec::new()
    };
    let total = candidates.len();

    info!(
        source = ?source_root,
        output = ?output_root,
        quality = %quality,
        total,
        "Starting JPEG batch conversion"
    );
    let start = Instant::now();

    let mut result = ConversionResult::new();
    for (idx, path) in candidates.into_iter().enumerate() {
        match guarded(|| convert_file(source_root, output_root, &path, quality)) {
            Ok(destination) => {
                debug!(source = ?path, destination = ?destination, "Converted");
                result.success();
            }
            Err(e) => {
                warn!(source = ?path, error = %e, "Failed to compress image");
                result.fail(path, e.to_string());
            }
        }

        on_progress(ProgressEvent {
            completed: idx + 1,
            total,
        });
    }

    info!(
        succeeded = result.succeeded_count,
        failed = result.failures.len(),
        duration_secs = start.elapsed().as_secs_f64(),
        "JPEG batch conversion finished"
    );

    result
}
