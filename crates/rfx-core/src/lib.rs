//! # rfx-core
//!
//! Core types for raster effect rendering.
//!
//! This crate provides the foundational types used throughout the RFX-RS
//! workspace:
//!
//! - [`ColorBgra`] - 8-bit per channel BGRA color
//! - [`Surface`] - Row-major pixel buffer with width/height
//! - [`Rect`] - Inclusive integer rectangle used for regions of interest
//! - [`Error`] - Buffer and region errors
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. The other crates build on it:
//!
//! ```text
//! rfx-core (this crate)
//!    ^
//!    |
//!    +-- rfx-ops (pixel operators, histogram engine, effects)
//!    +-- rfx-palette (palette model)
//!    +-- rfx-cli
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Parallel row iteration via rayon (enabled by default)
//! - `serde` - Serialization for [`ColorBgra`] and [`Rect`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod pixel;
pub mod rect;
pub mod surface;

// Re-exports for convenience
pub use error::*;
pub use pixel::{clamp_f32_to_byte, clamp_to_byte, ColorBgra, ALPHA, CHANNELS};
pub use rect::*;
pub use surface::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use rfx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::pixel::{clamp_f32_to_byte, clamp_to_byte, ColorBgra};
    pub use crate::rect::Rect;
    pub use crate::surface::Surface;
}
