//! Error types for the JPEG compressor.
//!
//! `ConvertError` covers one file; it is recorded and the batch moves on.
//! `PreconditionError` and `RunError` stop a run before any file is touched.

use std::path::PathBuf;
use thiserror::Error;

/// Largest width or height a baseline JPEG frame header can express.
pub const JPEG_MAX_DIMENSION: u32 = u16::MAX as u32;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("not under the source folder {}", root.display())]
    OutsideSourceRoot { root: PathBuf },

    #[error("cannot create output folder {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image is {width}x{height}, JPEG allows at most {max}x{max}", max = JPEG_MAX_DIMENSION)]
    Dimensions { width: u32, height: u32 },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] jpeg_encoder::EncodingError),

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Please select both folders.")]
    MissingFolders,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("a compression run is already in progress")]
    AlreadyRunning,

    #[error("failed to start worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}
