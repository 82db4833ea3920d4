//! Palette file-format registry.
//!
//! # Overview
//!
//! Formats are registered at runtime as a name, a list of extensions and an
//! optional loader and saver. Loading picks the format by file extension;
//! when the extension is unknown every readable format is tried in
//! registration order and the first that succeeds wins. If none does, the
//! per-format failures are collected into one
//! [`PaletteError::UnsupportedFormat`] report.
//!
//! No concrete file formats live here; hosts register their own.
//!
//! # Example
//!
//! ```rust
//! use rfx_core::ColorBgra;
//! use rfx_palette::{Palette, PaletteError, PaletteFormat, PaletteFormatRegistry, PaletteLoader};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Mono;
//!
//! impl PaletteLoader for Mono {
//!     fn load(&self, _path: &Path) -> Result<Vec<ColorBgra>, PaletteError> {
//!         Ok(vec![ColorBgra::BLACK, ColorBgra::WHITE])
//!     }
//! }
//!
//! let mut registry = PaletteFormatRegistry::new();
//! registry.register(PaletteFormat::new("Mono", &["mono"]).with_loader(Arc::new(Mono)));
//! assert_eq!(registry.supported_extensions(), vec!["mono".to_string()]);
//! ```

use crate::error::{PaletteError, PaletteResult};
use crate::palette::Palette;
use rfx_core::ColorBgra;
use std::fmt::{self, Write as _};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads colors from a file.
pub trait PaletteLoader: Send + Sync {
    /// Parses `path`.
    fn load(&self, path: &Path) -> PaletteResult<Vec<ColorBgra>>;
}

/// Writes colors to a file.
pub trait PaletteSaver: Send + Sync {
    /// Writes `colors` to `path`.
    fn save(&self, colors: &[ColorBgra], path: &Path) -> PaletteResult<()>;
}

/// A registered palette format.
#[derive(Clone)]
pub struct PaletteFormat {
    /// Display name.
    pub name: String,
    /// Extensions without the dot.
    pub extensions: Vec<String>,
    /// Reader, if the format can be read.
    pub loader: Option<Arc<dyn PaletteLoader>>,
    /// Writer, if the format can be written.
    pub saver: Option<Arc<dyn PaletteSaver>>,
}

impl PaletteFormat {
    /// Format with no loader or saver yet.
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            loader: None,
            saver: None,
        }
    }

    /// Attaches a loader.
    pub fn with_loader(mut self, loader: Arc<dyn PaletteLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Attaches a saver.
    pub fn with_saver(mut self, saver: Arc<dyn PaletteSaver>) -> Self {
        self.saver = Some(saver);
        self
    }

    /// `true` if the format has a saver but no loader.
    pub fn is_write_only(&self) -> bool {
        self.loader.is_none()
    }

    /// `true` if the format has no saver.
    pub fn is_read_only(&self) -> bool {
        self.saver.is_none()
    }

    /// Case-insensitive extension match.
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

impl fmt::Debug for PaletteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteFormat")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("loader", &self.loader.is_some())
            .field("saver", &self.saver.is_some())
            .finish()
    }
}

/// Ordered set of palette formats.
#[derive(Debug, Clone, Default)]
pub struct PaletteFormatRegistry {
    formats: Vec<PaletteFormat>,
}

impl PaletteFormatRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a format. Later formats are tried after earlier ones.
    pub fn register(&mut self, format: PaletteFormat) {
        debug!(name = %format.name, extensions = ?format.extensions, "register palette format");
        self.formats.push(format);
    }

    /// Formats in registration order.
    pub fn formats(&self) -> &[PaletteFormat] {
        &self.formats
    }

    /// Format by display name.
    pub fn format_by_name(&self, name: &str) -> Option<&PaletteFormat> {
        self.formats.iter().find(|f| f.name == name)
    }

    /// Format claiming the extension of `path`.
    pub fn format_for_path(&self, path: &Path) -> Option<&PaletteFormat> {
        let ext = path.extension()?.to_str()?;
        self.formats.iter().find(|f| f.matches_extension(ext))
    }

    /// Lower-case extensions of every readable format, sorted.
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self
            .formats
            .iter()
            .filter(|f| f.loader.is_some())
            .flat_map(|f| f.extensions.iter())
            .filter(|e| e.chars().next().is_some_and(|c| c.is_lowercase()))
            .cloned()
            .collect();
        exts.sort();
        exts.dedup();
        exts
    }

    /// Reads colors from `path`.
    ///
    /// A known extension uses that format's loader only. Otherwise every
    /// readable format is tried in order and the first success is returned.
    ///
    /// # Errors
    ///
    /// The loader's error for a known extension, or
    /// [`PaletteError::UnsupportedFormat`] when the scan finds nothing.
    pub fn read(&self, path: &Path) -> PaletteResult<Vec<ColorBgra>> {
        if let Some(format) = self.format_for_path(path) {
            if let Some(loader) = &format.loader {
                debug!(path = %path.display(), format = %format.name, "load palette");
                return loader.load(path);
            }
        }

        let mut details = String::new();
        let readable = self.formats.iter().filter_map(|f| f.loader.as_ref().map(|l| (f, l)));
        for (format, loader) in readable {
            match loader.load(path) {
                Ok(colors) => {
                    debug!(path = %path.display(), format = %format.name, "palette format found by scan");
                    return Ok(colors);
                }
                Err(e) => {
                    warn!(path = %path.display(), format = %format.name, error = %e, "palette format rejected file");
                    let _ = writeln!(details, "Failed to load palette as {}:", format.name);
                    let _ = writeln!(details, "{e}");
                }
            }
        }

        Err(PaletteError::UnsupportedFormat {
            path: path.to_path_buf(),
            extensions: self.supported_extensions(),
            details,
        })
    }

    /// Replaces the colors of `palette` with the contents of `path`.
    ///
    /// The palette is left untouched on failure.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn load(&self, palette: &mut Palette, path: &Path) -> PaletteResult<()> {
        let colors = self.read(path)?;
        palette.replace(colors);
        Ok(())
    }

    /// Writes `palette` to `path` using the named format.
    ///
    /// # Errors
    ///
    /// [`PaletteError::UnknownFormat`], [`PaletteError::ReadOnly`], or the
    /// saver's error.
    pub fn save(&self, palette: &Palette, path: &Path, format: &str) -> PaletteResult<()> {
        let entry = self
            .format_by_name(format)
            .ok_or_else(|| PaletteError::UnknownFormat(format.to_string()))?;
        let saver = entry
            .saver
            .as_ref()
            .ok_or_else(|| PaletteError::ReadOnly(entry.name.clone()))?;
        debug!(path = %path.display(), format = %entry.name, colors = palette.len(), "save palette");
        saver.save(palette.colors(), path)
    }
}
