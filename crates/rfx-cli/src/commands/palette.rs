//! Palette command
//!
//! Prints palette colors as `#RRGGBBAA`, one per line. Files are read
//! through a registry holding a single line-per-color hex format.

use crate::PaletteArgs;
use anyhow::{Context, Result};
use rfx_core::ColorBgra;
use rfx_palette::{Palette, PaletteError, PaletteFormat, PaletteFormatRegistry, PaletteLoader, PaletteResult};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// `#RRGGBB` or `#RRGGBBAA` per line; blank lines and `;` comments skipped.
struct HexLines;

impl PaletteLoader for HexLines {
    fn load(&self, path: &Path) -> PaletteResult<Vec<ColorBgra>> {
        let text = std::fs::read_to_string(path)?;
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with(';'))
            .enumerate()
            .map(|(i, l)| {
                ColorBgra::from_hex(l)
                    .ok_or_else(|| PaletteError::load_failed("Hex", format!("entry {}: not a color: '{l}'", i + 1)))
            })
            .collect()
    }
}

fn registry() -> PaletteFormatRegistry {
    let mut registry = PaletteFormatRegistry::new();
    registry.register(PaletteFormat::new("Hex", &["hex", "txt"]).with_loader(Arc::new(HexLines)));
    registry
}

pub fn run(args: PaletteArgs, verbose: bool) -> Result<()> {
    let mut palette = Palette::default();
    if verbose {
        palette.subscribe(|colors| eprintln!("palette changed: {} colors", colors.len()));
    }

    if let Some(path) = &args.input {
        debug!(path = %path.display(), "loading palette");
        registry()
            .load(&mut palette, path)
            .with_context(|| format!("Failed to load palette: {}", path.display()))?;
    }
    if let Some(len) = args.resize {
        palette.resize(len);
    }

    for (i, c) in palette.colors().iter().enumerate() {
        println!("{i:3}  {c}");
    }
    Ok(())
}
