//! Per-pixel color operators.
//!
//! A [`UnaryPixelOp`] maps one [`ColorBgra`] to another without looking at
//! neighbors. Operators are immutable after construction, so one instance
//! can be shared across render workers, and they can run in place.
//!
//! # Operators
//!
//! - [`Identity`] - passes pixels through
//! - [`Desaturate`] - replaces color with its luma, keeps alpha
//! - [`PosterizePixel`] - quantizes B, G, R to N evenly spaced levels
//! - [`ChannelMultiply`] - scales R, G, B by constant factors (warmth)
//! - [`Level`](crate::level::Level) - input/output range remap with gamma
//! - [`Chain`] - applies several operators in order
//!
//! # Example
//!
//! ```rust
//! use rfx_core::ColorBgra;
//! use rfx_ops::pixel_ops::{Desaturate, UnaryPixelOp};
//!
//! let out = Desaturate.apply(ColorBgra::from_rgba(255, 0, 0, 77));
//! assert_eq!(out.r, out.g);
//! assert_eq!(out.a, 77);
//! ```

use crate::render::{for_each_span, validate, RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{clamp_f32_to_byte, ColorBgra, Rect, Surface};
use tracing::trace;

/// A pure function from one pixel to one pixel.
pub trait UnaryPixelOp: Send + Sync {
    /// Maps a single pixel.
    fn apply(&self, color: ColorBgra) -> ColorBgra;

    /// Maps `src` into `dst` element-wise. Extra elements of the longer slice are untouched.
    fn apply_row(&self, src: &[ColorBgra], dst: &mut [ColorBgra]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = self.apply(*s);
        }
    }

    /// Maps a row in place.
    fn apply_row_in_place(&self, row: &mut [ColorBgra]) {
        for c in row {
            *c = self.apply(*c);
        }
    }

    /// Applies the operator to `rois` of `src`, writing into `dst`.
    ///
    /// # Errors
    ///
    /// Fails if the surfaces differ in size or a region is outside them.
    fn apply_to(
        &self,
        src: &Surface,
        dst: &mut Surface,
        rois: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        validate(src, dst, rois)?;
        Ok(for_each_span(dst, rois, ctx, || (), |_, span, out| {
            let row = &src.row(span.y)[span.x0 as usize..=span.x1 as usize];
            self.apply_row(row, out);
        }))
    }

    /// Applies the operator to `rois` of `surface` in place.
    fn apply_in_place(
        &self,
        surface: &mut Surface,
        rois: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        for roi in rois {
            surface.ensure_contains(roi)?;
        }
        Ok(for_each_span(surface, rois, ctx, || (), |_, _, out| {
            self.apply_row_in_place(out);
        }))
    }
}

impl<T: UnaryPixelOp + ?Sized> UnaryPixelOp for Box<T> {
    #[inline]
    fn apply(&self, color: ColorBgra) -> ColorBgra {
        (**self).apply(color)
    }
}

/// Passes every pixel through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl UnaryPixelOp for Identity {
    #[inline]
    fn apply(&self, color: ColorBgra) -> ColorBgra {
        color
    }

    fn apply_row(&self, src: &[ColorBgra], dst: &mut [ColorBgra]) {
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
    }

    fn apply_row_in_place(&self, _row: &mut [ColorBgra]) {}
}

/// Replaces B, G and R with the pixel's intensity byte; alpha is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Desaturate;

impl UnaryPixelOp for Desaturate {
    #[inline]
    fn apply(&self, color: ColorBgra) -> ColorBgra {
        let i = color.intensity_byte();
        ColorBgra::from_bgra(i, i, i, color.a)
    }
}

/// Smallest level count accepted by [`PosterizePixel`].
pub const POSTERIZE_MIN_LEVELS: u32 = 2;
/// Largest level count accepted by [`PosterizePixel`].
pub const POSTERIZE_MAX_LEVELS: u32 = 64;

/// Quantizes each color channel to `N` evenly spaced levels.
///
/// Level `k` of `N` is `k * 255 / (N - 1)`, so 0 and 255 are always
/// representable. Input values snap to the nearest level. Alpha is
/// untouched. Lookup tables are built once at construction.
#[derive(Clone)]
pub struct PosterizePixel {
    levels: [u32; 3],
    tables: [[u8; 256]; 3],
}

impl PosterizePixel {
    /// Creates an operator with per-channel level counts.
    ///
    /// Counts are clamped to
    /// [`POSTERIZE_MIN_LEVELS`]..=[`POSTERIZE_MAX_LEVELS`].
    pub fn new(red: u32, green: u32, blue: u32) -> Self {
        let levels = [blue, green, red].map(|n| n.clamp(POSTERIZE_MIN_LEVELS, POSTERIZE_MAX_LEVELS));
        let tables = levels.map(Self::build_table);
        trace!(red = levels[2], green = levels[1], blue = levels[0], "PosterizePixel::new");
        Self { levels, tables }
    }

    /// Same level count on every color channel.
    pub fn uniform(levels: u32) -> Self {
        Self::new(levels, levels, levels)
    }

    /// Level counts as `[blue, green, red]`.
    pub fn levels(&self) -> [u32; 3] {
        self.levels
    }

    fn build_table(n: u32) -> [u8; 256] {
        let steps = n - 1;
        let mut table = [0u8; 256];
        for (v, slot) in table.iter_mut().enumerate() {
            let v = v as u32;
            // round(v * steps / 255) in integers
            let k = (2 * v * steps + 255) / 510;
            *slot = (k * 255 / steps) as u8;
        }
        table
    }
}

impl std::fmt::Debug for PosterizePixel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosterizePixel").field("levels", &self.levels).finish()
    }
}

impl UnaryPixelOp for PosterizePixel {
    #[inline]
    fn apply(&self, c: ColorBgra) -> ColorBgra {
        ColorBgra::from_bgra(
            self.tables[0][c.b as usize],
            self.tables[1][c.g as usize],
            self.tables[2][c.r as usize],
            c.a,
        )
    }
}

/// Multiplies R, G and B by constant factors, truncating and clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMultiply {
    /// Red factor.
    pub red: f32,
    /// Green factor.
    pub green: f32,
    /// Blue factor.
    pub blue: f32,
}

impl ChannelMultiply {
    /// Warm shift: red gains `warmth` percent, blue loses the same.
    pub fn warmth(warmth: f32) -> Self {
        Self {
            red: 1.0 + warmth / 100.0,
            green: 1.0,
            blue: 1.0 - warmth / 100.0,
        }
    }
}

impl UnaryPixelOp for ChannelMultiply {
    #[inline]
    fn apply(&self, c: ColorBgra) -> ColorBgra {
        ColorBgra::from_bgra(
            clamp_f32_to_byte(c.b as f32 * self.blue),
            clamp_f32_to_byte(c.g as f32 * self.green),
            clamp_f32_to_byte(c.r as f32 * self.red),
            c.a,
        )
    }
}

/// Applies operators left to right.
#[derive(Default)]
pub struct Chain {
    ops: Vec<Box<dyn UnaryPixelOp>>,
}

impl Chain {
    /// Creates an empty chain (behaves as [`Identity`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operator.
    pub fn then(mut self, op: impl UnaryPixelOp + 'static) -> Self {
        self.ops.push(Box::new(op));
        self
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the chain has no operators.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl UnaryPixelOp for Chain {
    #[inline]
    fn apply(&self, color: ColorBgra) -> ColorBgra {
        self.ops.iter().fold(color, |c, op| op.apply(c))
    }
}
