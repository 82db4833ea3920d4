//! # rfx-palette
//!
//! Color palettes for the editor's swatch panel.
//!
//! - [`Palette`] - ordered colors with change callbacks
//! - [`PaletteFormatRegistry`] - extension-based format lookup with a
//!   fallback scan over every readable format
//!
//! Concrete file formats are supplied by the host through the
//! [`PaletteLoader`] and [`PaletteSaver`] traits.
//!
//! ```rust
//! use rfx_palette::Palette;
//!
//! let mut palette = Palette::default();
//! palette.subscribe(|colors| println!("{} colors", colors.len()));
//! palette.resize(40);
//! assert_eq!(palette.len(), 40);
//! ```

#![warn(missing_docs)]

mod error;
pub mod format;
pub mod palette;

pub use error::{PaletteError, PaletteResult};
pub use format::{PaletteFormat, PaletteFormatRegistry, PaletteLoader, PaletteSaver};
pub use palette::{default_colors, Palette, PaletteListener, SubscriptionId, DEFAULT_PALETTE_LEN};
