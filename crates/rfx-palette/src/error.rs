//! Palette error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for palette operations.
pub type PaletteResult<T> = std::result::Result<T, PaletteError>;

/// Errors raised while editing, loading or saving palettes.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// Underlying file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single format failed to parse a file.
    #[error("failed to load palette as {format}: {reason}")]
    LoadFailed {
        /// Format name.
        format: String,
        /// Loader diagnostic.
        reason: String,
    },

    /// No registered format could read the file.
    ///
    /// `details` holds one block per attempted format.
    #[error("unsupported palette format: {} (supported: {})", path.display(), extensions.join(", "))]
    UnsupportedFormat {
        /// The file that was opened.
        path: PathBuf,
        /// Extensions with a loader, lower-case and sorted.
        extensions: Vec<String>,
        /// Aggregated per-format failures.
        details: String,
    },

    /// The format has no saver.
    #[error("palette format {0} cannot be written")]
    ReadOnly(String),

    /// No format is registered under that name.
    #[error("unknown palette format: {0}")]
    UnknownFormat(String),

    /// Color index past the end of the palette.
    #[error("palette index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Palette length.
        len: usize,
    },
}

impl PaletteError {
    /// Builds a [`PaletteError::LoadFailed`].
    pub fn load_failed(format: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::LoadFailed {
            format: format.into(),
            reason: reason.to_string(),
        }
    }
}
