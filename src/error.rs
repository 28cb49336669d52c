//! Error types for the galaxy engine.
//!
//! Failure kinds the engine distinguishes before and during a run. I/O and
//! config errors are wrapped into `anyhow` at the application boundary.

use std::fmt;

/// Errors that can occur while loading, validating, or encoding `.gal` data.
#[derive(Debug)]
pub enum GalError {
    /// File byte length is not a multiple of 8, so it cannot be a sequence
    /// of IEEE-754 doubles.
    TruncatedFile { len: usize },
    /// Value count is not a multiple of 6, so the body count is not integral.
    Format { values: usize },
    /// The input holds zero bodies; `G = 100 / N` is undefined.
    DegenerateConfig,
    /// Reading or writing the file failed.
    Io(std::io::Error),
}

impl fmt::Display for GalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalError::TruncatedFile { len } => write!(
                f,
                "file length {} bytes is not a multiple of 8; not a flat sequence of doubles",
                len
            ),
            GalError::Format { values } => write!(
                f,
                "{} values do not group into 6-field body records",
                values
            ),
            GalError::DegenerateConfig => {
                write!(f, "input contains no bodies; the simulation cannot start")
            }
            GalError::Io(e) => write!(f, "gal file I/O failed: {}", e),
        }
    }
}

impl std::error::Error for GalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GalError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GalError {
    fn from(e: std::io::Error) -> Self {
        GalError::Io(e)
    }
}
