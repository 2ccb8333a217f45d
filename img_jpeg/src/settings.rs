//! Front-end form state and its conversion into a run request.

use crate::conversion_api::ConversionRequest;
use crate::errors::PreconditionError;
use crate::quality::Quality;
use std::path::PathBuf;

/// What the user has picked so far. Folders may still be unset; quality is
/// free text exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub quality_text: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            source: None,
            output: None,
            quality_text: Quality::DEFAULT.to_string(),
        }
    }
}

impl RunSettings {
    pub fn new(
        source: Option<PathBuf>,
        output: Option<PathBuf>,
        quality_text: impl Into<String>,
    ) -> Self {
        Self {
            source,
            output,
            quality_text: quality_text.into(),
        }
    }

    /// Snapshot for the worker. Both folders must be chosen; an empty path
    /// counts as not chosen. Bad quality text falls back to the default.
    pub fn to_request(&self) -> Result<ConversionRequest, PreconditionError> {
        let chosen = |p: &Option<PathBuf>| p.clone().filter(|p| !p.as_os_str().is_empty());
        match (chosen(&self.source), chosen(&self.output)) {
            (Some(source), Some(output)) => Ok(ConversionRequest::new(
                source,
                output,
                Quality::parse_lenient(&self.quality_text),
            )),
            _ => Err(PreconditionError::MissingFolders),
        }
    }
}
