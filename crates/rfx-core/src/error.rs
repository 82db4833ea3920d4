//! Error types for rfx-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of the core buffer types:
//! - Surface construction (dimension/data length checks)
//! - Pixel access outside the surface
//! - Regions that do not fit inside a surface
//! - Source/destination size mismatches
//!
//! Degenerate numeric situations inside effects (empty neighborhoods and
//! the like) are not errors; effects resolve them to well-defined values.
//!
//! # Usage
//!
//! ```rust
//! use rfx_core::{Error, Result};
//!
//! fn check_pixel(x: i32, y: i32, width: i32, height: i32) -> Result<()> {
//!     if x < 0 || y < 0 || x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::surface::Surface`] - Buffer construction and access
//! - [`crate::rect::Rect`] - Region validation
//! - `rfx-ops` - Wrapped by `OpsError::Core`

use crate::Rect;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in core buffer operations.
///
/// # Categories
///
/// - **Bounds errors**: [`OutOfBounds`](Error::OutOfBounds), [`InvalidRegion`](Error::InvalidRegion)
/// - **Dimension errors**: [`DimensionMismatch`](Error::DimensionMismatch), [`InvalidDimensions`](Error::InvalidDimensions)
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel coordinates are outside surface bounds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rfx_core::Error;
    ///
    /// let err = Error::out_of_bounds(100, 50, 80, 60);
    /// assert!(err.to_string().contains("100"));
    /// ```
    #[error("pixel ({x}, {y}) out of bounds for surface {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: i32,
        /// Y coordinate that was out of bounds
        y: i32,
        /// Surface width
        width: i32,
        /// Surface height
        height: i32,
    },

    /// Region is inverted or extends beyond surface bounds.
    #[error("region {rect} is not inside surface {width}x{height}")]
    InvalidRegion {
        /// Offending region
        rect: Rect,
        /// Surface width
        width: i32,
        /// Surface height
        height: i32,
    },

    /// Two surfaces that must match in size do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First surface width
        a_width: i32,
        /// First surface height
        a_height: i32,
        /// Second surface width
        b_width: i32,
        /// Second surface height
        b_height: i32,
    },

    /// Invalid surface dimensions.
    ///
    /// Returned when width or height is negative, or the supplied pixel
    /// data does not hold exactly `width * height` colors.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: i32,
        /// Requested height
        height: i32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rect: Rect, width: i32, height: i32) -> Self {
        Self::InvalidRegion {
            rect,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: i32, height: i32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (i32, i32), b: (i32, i32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidRegion { .. })
    }
}
