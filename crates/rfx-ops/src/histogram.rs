//! Sliding circular-neighborhood histograms.
//!
//! [`LocalHistogramEngine`] computes, for every pixel of a region, a
//! statistic over the pixels inside a disc of radius `r` centered on it.
//! The disc is described by a [`KernelShape`]: for each row offset
//! `dy ∈ [-r, r]` the half-width `floor(sqrt(r² - dy²))`.
//!
//! # Sweep
//!
//! For every span of a region row:
//!
//! 1. At the first column the [`HistogramState`] is built from scratch, cost
//!    proportional to the kernel area.
//! 2. Each step right removes, per kernel row, the pixel leaving the
//!    trailing edge and adds the one entering the leading edge. Cost is
//!    proportional to the kernel height.
//! 3. A [`HistogramQuery`] turns the histogram into the output pixel.
//!
//! The footprint is clipped at the surface edges: pixels outside are
//! neither counted nor substituted, and the histogram `area` shrinks
//! accordingly. At all times every channel's counts sum to `area`.
//!
//! Rows are independent, so the render driver hands each worker its own
//! `HistogramState`. The kernel table is immutable and shared.
//!
//! # Example
//!
//! ```rust
//! use rfx_core::{ColorBgra, Rect, Surface};
//! use rfx_ops::histogram::{LocalHistogramEngine, PercentileQuery};
//! use rfx_ops::render::RenderContext;
//!
//! let src = Surface::filled(16, 16, ColorBgra::gray(90));
//! let mut dst = Surface::new(16, 16);
//! let engine = LocalHistogramEngine::with_radius(3);
//! engine
//!     .render(&src, &mut dst, &[src.bounds()], &PercentileQuery::median(), &RenderContext::default())
//!     .unwrap();
//! assert_eq!(dst, src);
//! ```

use crate::render::{for_each_span, validate, RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{ColorBgra, Rect, Surface, CHANNELS};
use std::sync::Arc;
use tracing::{debug, trace};

/// Half-widths of a digital disc, one per row offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelShape {
    radius: i32,
    half_widths: Vec<i32>,
}

impl KernelShape {
    /// Builds the table for `radius`.
    ///
    /// Radius 0 is a single pixel.
    pub fn new(radius: u32) -> Self {
        let r = radius as i64;
        let half_widths = (-r..=r).map(|dy| isqrt(r * r - dy * dy) as i32).collect();
        Self {
            radius: radius as i32,
            half_widths,
        }
    }

    /// Kernel radius.
    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Half-width at row offset `dy`, or `None` outside `[-r, r]`.
    #[inline]
    pub fn half_width(&self, dy: i32) -> Option<i32> {
        if dy.abs() > self.radius {
            return None;
        }
        Some(self.half_widths[(dy + self.radius) as usize])
    }

    /// Iterates `(dy, half_width)` from `-r` to `r`.
    pub fn rows(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.half_widths
            .iter()
            .enumerate()
            .map(move |(i, &hw)| (i as i32 - self.radius, hw))
    }

    /// Pixel count of the unclipped footprint.
    pub fn area(&self) -> u32 {
        self.half_widths.iter().map(|&hw| (2 * hw + 1) as u32).sum()
    }

    /// `true` if `(dx, dy)` lies inside the footprint.
    pub fn contains(&self, dx: i32, dy: i32) -> bool {
        self.half_width(dy).is_some_and(|hw| dx.abs() <= hw)
    }
}

/// Integer square root, floor.
fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut s = (n as f64).sqrt() as i64;
    while s * s > n {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= n {
        s += 1;
    }
    s
}

/// Per-channel 256-bin counts over the current footprint.
#[derive(Clone)]
pub struct HistogramState {
    counts: [[u32; 256]; CHANNELS],
    area: u32,
}

impl Default for HistogramState {
    fn default() -> Self {
        Self {
            counts: [[0; 256]; CHANNELS],
            area: 0,
        }
    }
}

impl std::fmt::Debug for HistogramState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistogramState").field("area", &self.area).finish_non_exhaustive()
    }
}

impl HistogramState {
    /// Empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every count and the area to zero.
    pub fn clear(&mut self) {
        for c in &mut self.counts {
            c.fill(0);
        }
        self.area = 0;
    }

    /// Adds one pixel.
    #[inline]
    pub fn add(&mut self, c: ColorBgra) {
        self.counts[0][c.b as usize] += 1;
        self.counts[1][c.g as usize] += 1;
        self.counts[2][c.r as usize] += 1;
        self.counts[3][c.a as usize] += 1;
        self.area += 1;
    }

    /// Removes one pixel previously added.
    #[inline]
    pub fn remove(&mut self, c: ColorBgra) {
        debug_assert!(self.area > 0, "remove from empty histogram");
        self.counts[0][c.b as usize] -= 1;
        self.counts[1][c.g as usize] -= 1;
        self.counts[2][c.r as usize] -= 1;
        self.counts[3][c.a as usize] -= 1;
        self.area -= 1;
    }

    /// Number of pixels currently counted.
    #[inline]
    pub fn area(&self) -> u32 {
        self.area
    }

    /// `true` if nothing is counted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area == 0
    }

    /// Bins of channel `index` (B=0, G=1, R=2, A=3).
    #[inline]
    pub fn counts(&self, index: usize) -> &[u32; 256] {
        &self.counts[index]
    }

    /// `true` if every channel's counts sum to `area`.
    pub fn is_consistent(&self) -> bool {
        self.counts
            .iter()
            .all(|c| c.iter().map(|&n| n as u64).sum::<u64>() == self.area as u64)
    }

    /// Percentile of channel `index`.
    ///
    /// With `threshold = area * percentile / 100` (integer), returns the
    /// first bin whose cumulative count exceeds the threshold. If none does
    /// (percentile 100), returns the highest occupied bin. `None` when the
    /// histogram is empty. Percentiles above 100 act as 100.
    pub fn percentile(&self, index: usize, percentile: u32) -> Option<u8> {
        if self.area == 0 {
            return None;
        }
        let threshold = self.area as u64 * percentile.min(100) as u64 / 100;
        let mut cumulative = 0u64;
        let mut highest = 0u8;
        for (bin, &n) in self.counts[index].iter().enumerate() {
            if n == 0 {
                continue;
            }
            cumulative += n as u64;
            highest = bin as u8;
            if cumulative > threshold {
                return Some(bin as u8);
            }
        }
        Some(highest)
    }

    /// Percentile of all four channels, or `fallback` when empty.
    pub fn percentile_color(&self, percentile: u32, fallback: ColorBgra) -> ColorBgra {
        if self.area == 0 {
            return fallback;
        }
        let mut out = [0u8; CHANNELS];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.percentile(i, percentile).unwrap_or(fallback.channel(i));
        }
        ColorBgra::from_array(out)
    }

    /// Count of pixels whose channel `index` is strictly below `value`.
    pub fn rank_below(&self, index: usize, value: u8) -> u32 {
        self.counts[index][..value as usize].iter().sum()
    }
}

/// Turns a neighborhood histogram into an output pixel.
pub trait HistogramQuery: Send + Sync {
    /// `center` is the source pixel at the cursor; `hist` covers its
    /// clipped footprint.
    fn apply(&self, center: ColorBgra, hist: &HistogramState) -> ColorBgra;
}

/// Per-channel percentile of the neighborhood, alpha included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentileQuery {
    percentile: u32,
}

impl PercentileQuery {
    /// Creates a query; `percentile` is clamped to `[0, 100]`.
    pub fn new(percentile: u32) -> Self {
        Self {
            percentile: percentile.min(100),
        }
    }

    /// The 50th percentile.
    pub fn median() -> Self {
        Self::new(50)
    }

    /// Configured percentile.
    pub fn percentile(&self) -> u32 {
        self.percentile
    }
}

impl HistogramQuery for PercentileQuery {
    #[inline]
    fn apply(&self, center: ColorBgra, hist: &HistogramState) -> ColorBgra {
        hist.percentile_color(self.percentile, center)
    }
}

/// Drives a [`HistogramQuery`] over regions with an incrementally updated
/// circular footprint.
#[derive(Debug, Clone)]
pub struct LocalHistogramEngine {
    kernel: Arc<KernelShape>,
}

impl LocalHistogramEngine {
    /// Engine over an existing kernel table.
    pub fn new(kernel: Arc<KernelShape>) -> Self {
        Self { kernel }
    }

    /// Engine with a freshly built kernel of `radius`.
    pub fn with_radius(radius: u32) -> Self {
        Self::new(Arc::new(KernelShape::new(radius)))
    }

    /// The footprint.
    pub fn kernel(&self) -> &KernelShape {
        &self.kernel
    }

    /// Fills `hist` with the clipped footprint centered on `(x, y)`.
    pub fn build(&self, src: &Surface, x: i32, y: i32, hist: &mut HistogramState) {
        hist.clear();
        let (w, h) = src.dimensions();
        for (dy, hw) in self.kernel.rows() {
            let sy = y + dy;
            if sy < 0 || sy >= h {
                continue;
            }
            let left = (x - hw).max(0);
            let right = (x + hw).min(w - 1);
            if left > right {
                continue;
            }
            for &c in &src.row(sy)[left as usize..=right as usize] {
                hist.add(c);
            }
        }
    }

    /// Moves the footprint from `(x - 1, y)` to `(x, y)`.
    pub fn slide(&self, src: &Surface, x: i32, y: i32, hist: &mut HistogramState) {
        let (w, h) = src.dimensions();
        for (dy, hw) in self.kernel.rows() {
            let sy = y + dy;
            if sy < 0 || sy >= h {
                continue;
            }
            let row = src.row(sy);
            let leaving = x - 1 - hw;
            if leaving >= 0 && leaving < w {
                hist.remove(row[leaving as usize]);
            }
            let entering = x + hw;
            if entering >= 0 && entering < w {
                hist.add(row[entering as usize]);
            }
        }
    }

    /// Sweeps columns `x0..=x1` of row `y`, writing one query result per
    /// column into `out`.
    #[allow(clippy::too_many_arguments)]
    pub fn sweep_row<Q: HistogramQuery + ?Sized>(
        &self,
        src: &Surface,
        y: i32,
        x0: i32,
        x1: i32,
        query: &Q,
        hist: &mut HistogramState,
        out: &mut [ColorBgra],
    ) {
        debug_assert_eq!(out.len(), (x1 - x0 + 1) as usize);
        let row = src.row(y);
        self.build(src, x0, y, hist);
        out[0] = query.apply(row[x0 as usize], hist);
        for x in x0 + 1..=x1 {
            self.slide(src, x, y, hist);
            debug_assert!(hist.is_consistent());
            out[(x - x0) as usize] = query.apply(row[x as usize], hist);
        }
    }

    /// Runs `query` over `rois` of `src`, writing into `dst`.
    ///
    /// # Errors
    ///
    /// Fails if the surfaces differ in size or a region is outside them.
    pub fn render<Q: HistogramQuery + ?Sized>(
        &self,
        src: &Surface,
        dst: &mut Surface,
        rois: &[Rect],
        query: &Q,
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        validate(src, dst, rois)?;
        trace!(
            width = src.width(),
            height = src.height(),
            radius = self.kernel.radius(),
            regions = rois.len(),
            "LocalHistogramEngine::render"
        );
        let status = for_each_span(dst, rois, ctx, HistogramState::new, |hist, span, out| {
            self.sweep_row(src, span.y, span.x0, span.x1, query, hist, out);
        });
        debug!(?status, radius = self.kernel.radius(), "local histogram pass done");
        Ok(status)
    }
}
