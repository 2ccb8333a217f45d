//! JPEG quality type-safe wrapper
//!
//! Values are validated once on construction. Front ends that take free text
//! use the lenient constructors, which fall back to [`Quality::DEFAULT`]
//! instead of failing the run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualityError {
    #[error("JPEG quality {value} is out of range [{}, {}]", Quality::MIN, Quality::MAX)]
    OutOfRange { value: i64 },

    #[error("JPEG quality '{0}' is not a number")]
    NotANumber(String),
}

/// JPEG encoder quality, always within 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;
    pub const DEFAULT: Quality = Quality(70);

    pub fn new(value: i64) -> Result<Self, QualityError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Quality(value as u8))
        } else {
            Err(QualityError::OutOfRange { value })
        }
    }

    pub fn from_int_or_default(value: i64) -> Self {
        Self::new(value).unwrap_or_else(|e| {
            warn!(error = %e, default = %Self::DEFAULT, "Using default JPEG quality");
            Self::DEFAULT
        })
    }

    /// Parses free text, falling back to 70 for anything that is not an
    /// integer in range.
    pub fn parse_lenient(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(value) => Self::from_int_or_default(value),
            Err(_) => {
                warn!(input = text, default = %Self::DEFAULT, "JPEG quality is not a number, using default");
                Self::DEFAULT
            }
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quality {
    type Err = QualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| QualityError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<i64> for Quality {
    type Error = QualityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}
