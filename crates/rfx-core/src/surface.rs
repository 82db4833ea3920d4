//! Pixel buffer type for effect rendering.
//!
//! [`Surface`] is an owned `width x height` grid of [`ColorBgra`] stored
//! row-major, top-to-bottom:
//!
//! ```text
//! Memory: [P(0,0) P(1,0) P(2,0) ...]  ← Row 0
//!         [P(0,1) P(1,1) P(2,1) ...]  ← Row 1
//!         ...
//! ```
//!
//! Effects read a `&Surface` source and write a `&mut Surface`
//! destination. The borrow rules keep the two from aliasing; per-pixel
//! operators that are safe in place expose a separate in-place entry point
//! instead.
//!
//! # Usage
//!
//! ```rust
//! use rfx_core::{ColorBgra, Surface};
//!
//! let mut surface = Surface::new(64, 32);
//! surface.set_pixel(10, 5, ColorBgra::WHITE);
//! assert_eq!(surface.pixel(10, 5), ColorBgra::WHITE);
//! assert_eq!(surface.row(5).len(), 64);
//! ```
//!
//! # Dependencies
//!
//! - [`crate::pixel::ColorBgra`] - Element type
//! - [`crate::rect::Rect`] - Bounds and region copies
//! - [`rayon`] - Parallel row iteration (optional)
//! - `sha2` - Content digest (optional, `digest` feature)

use crate::{ColorBgra, Error, Rect, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Owned BGRA pixel buffer.
///
/// # Example
///
/// ```rust
/// use rfx_core::{ColorBgra, Surface};
///
/// let gray = Surface::filled(4, 4, ColorBgra::gray(128));
/// assert!(gray.data().iter().all(|&c| c == ColorBgra::gray(128)));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    data: Vec<ColorBgra>,
    width: i32,
    height: i32,
}

impl Surface {
    /// Creates a new surface filled with transparent black.
    ///
    /// Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, ColorBgra::TRANSPARENT)
    }

    /// Creates a surface filled with a specific color.
    pub fn filled(width: i32, height: i32, color: ColorBgra) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            data: vec![color; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Creates a surface from existing row-major pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if a dimension is negative or
    /// `data.len() != width * height`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rfx_core::{ColorBgra, Surface};
    ///
    /// let s = Surface::from_data(2, 1, vec![ColorBgra::BLACK, ColorBgra::WHITE]).unwrap();
    /// assert_eq!(s.pixel(1, 0), ColorBgra::WHITE);
    /// assert!(Surface::from_data(3, 1, vec![ColorBgra::BLACK]).is_err());
    /// ```
    pub fn from_data(width: i32, height: i32, data: Vec<ColorBgra>) -> Result<Self> {
        if width < 0 || height < 0 {
            return Err(Error::invalid_dimensions(width, height, "negative dimension"));
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, data.len()),
            ));
        }
        Ok(Self { data, width, height })
    }

    /// Creates a surface by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(i32, i32) -> ColorBgra) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { data, width, height }
    }

    /// Returns the surface width in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Returns the surface height in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns the surface dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Returns the rectangle covering the whole surface.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the surface has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the raw pixel data.
    #[inline]
    pub fn data(&self) -> &[ColorBgra] {
        &self.data
    }

    /// Returns mutable raw pixel data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [ColorBgra] {
        &mut self.data
    }

    /// Consumes the surface and returns its pixel data.
    pub fn into_data(self) -> Vec<ColorBgra> {
        self.data
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.bounds().contains(x, y), "pixel ({x}, {y}) outside {}x{}", self.width, self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the surface.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> ColorBgra {
        self.data[self.offset(x, y)]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<ColorBgra> {
        if self.bounds().contains(x, y) {
            Some(self.data[self.offset(x, y)])
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the surface.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: ColorBgra) {
        let offset = self.offset(x, y);
        self.data[offset] = color;
    }

    /// Fills the entire surface with a color.
    pub fn fill(&mut self, color: ColorBgra) {
        self.data.fill(color);
    }

    /// Returns row `y` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside the surface.
    #[inline]
    pub fn row(&self, y: i32) -> &[ColorBgra] {
        let start = self.offset(0, y);
        &self.data[start..start + self.width as usize]
    }

    /// Returns row `y` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, y: i32) -> &mut [ColorBgra] {
        let start = self.offset(0, y);
        let width = self.width as usize;
        &mut self.data[start..start + width]
    }

    /// Iterates over mutable rows, paired with their y coordinate.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (i32, &mut [ColorBgra])> {
        let width = self.width.max(1) as usize;
        self.data
            .chunks_mut(width)
            .enumerate()
            .map(|(y, row)| (y as i32, row))
    }

    /// Parallel iterator over mutable rows, paired with their y coordinate.
    ///
    /// Rows are disjoint slices, so each worker owns the rows it is handed.
    #[cfg(feature = "parallel")]
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (i32, &mut [ColorBgra])> {
        let width = self.width.max(1) as usize;
        self.data
            .par_chunks_mut(width)
            .enumerate()
            .map(|(y, row)| (y as i32, row))
    }

    /// Returns `Ok(())` if `other` has the same dimensions.
    pub fn ensure_same_size(&self, other: &Surface) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }

    /// Returns `Ok(())` if `rect` is non-inverted and lies inside the surface.
    pub fn ensure_contains(&self, rect: &Rect) -> Result<()> {
        if rect.width < 0 || rect.height < 0 || (!rect.is_empty() && !self.bounds().contains_rect(rect)) {
            return Err(Error::invalid_region(*rect, self.width, self.height));
        }
        Ok(())
    }

    /// Copies the pixels of `rect` from `src` into this surface.
    ///
    /// # Errors
    ///
    /// Fails if the surfaces differ in size or `rect` is not inside them.
    pub fn copy_region_from(&mut self, src: &Surface, rect: &Rect) -> Result<()> {
        self.ensure_same_size(src)?;
        self.ensure_contains(rect)?;
        if rect.is_empty() {
            return Ok(());
        }
        let (l, r) = (rect.left() as usize, rect.right() as usize);
        for y in rect.top()..=rect.bottom() {
            self.row_mut(y)[l..=r].copy_from_slice(&src.row(y)[l..=r]);
        }
        Ok(())
    }

    /// SHA-256 of the pixel bytes in BGRA order, lower-case hex.
    ///
    /// Two surfaces with the same dimensions and pixels have the same
    /// digest; dimensions themselves are not hashed.
    #[cfg(feature = "digest")]
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for c in &self.data {
            hasher.update(c.to_array());
        }
        hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
