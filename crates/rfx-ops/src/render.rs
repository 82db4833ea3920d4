//! Region-restricted render driver.
//!
//! Every effect funnels its writes through [`for_each_span`], which visits
//! each row of each region exactly once and hands the callback the
//! destination slice for that span. Writes therefore cannot land outside
//! the supplied region list.
//!
//! With the `parallel` feature, rows are distributed over rayon workers.
//! Destination rows are disjoint `&mut` slices, the source is borrowed
//! immutably, and per-worker scratch state comes from an `init` closure
//! (`for_each_init`), so no scratch is ever shared between workers.
//!
//! # Cancellation
//!
//! A [`CancelToken`] is polled once per scanline. After cancellation the
//! remaining rows are skipped; rows that were already written hold valid
//! results. A pass reports [`RenderStatus::Cancelled`] only when at least
//! one row was skipped; a token raised after the last row leaves the pass
//! `Completed`.
//!
//! # Example
//!
//! ```rust
//! use rfx_core::{ColorBgra, Rect, Surface};
//! use rfx_ops::render::{for_each_span, RenderContext, RenderStatus};
//!
//! let mut dst = Surface::new(8, 8);
//! let rois = [Rect::from_ltrb(2, 2, 5, 3)];
//! let status = for_each_span(&mut dst, &rois, &RenderContext::default(), || (), |_, _span, out| {
//!     out.fill(ColorBgra::WHITE);
//! });
//! assert_eq!(status, RenderStatus::Completed);
//! assert_eq!(dst.pixel(2, 2), ColorBgra::WHITE);
//! assert_eq!(dst.pixel(1, 2), ColorBgra::TRANSPARENT);
//! ```

use crate::OpsResult;
use rfx_core::{ColorBgra, Rect, Surface};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Shared cooperative-cancellation flag.
///
/// Clones observe the same flag, so a UI thread can keep one clone and
/// hand another to the render.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the "not cancelled" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-call render settings.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Cancellation flag polled per scanline.
    pub cancel: CancelToken,
    /// Distribute rows over the rayon pool (ignored without `parallel`).
    pub parallel: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            cancel: CancelToken::new(),
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl RenderContext {
    /// Context that renders on the calling thread only.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Replaces the cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Outcome of a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Every region was fully written.
    Completed,
    /// Cancellation was observed; some rows may be unwritten.
    Cancelled,
}

impl RenderStatus {
    /// Returns `true` for [`RenderStatus::Completed`].
    #[inline]
    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// A horizontal run of pixels of one region on one row.
///
/// `x0..=x1` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Row.
    pub y: i32,
    /// First column.
    pub x0: i32,
    /// Last column.
    pub x1: i32,
}

impl Span {
    /// Number of pixels in the span.
    #[inline]
    pub fn len(&self) -> usize {
        (self.x1 - self.x0 + 1) as usize
    }

    /// Always `false`; spans are never produced empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Checks that `src` and `dst` match in size and every region is inside them.
///
/// # Errors
///
/// `OpsError::Core` wrapping `DimensionMismatch` or `InvalidRegion`.
pub fn validate(src: &Surface, dst: &Surface, rois: &[Rect]) -> OpsResult<()> {
    src.ensure_same_size(dst)?;
    for roi in rois {
        dst.ensure_contains(roi)?;
    }
    Ok(())
}

/// Visits every (row, span) of `rois` in `dst`.
///
/// `init` creates per-worker scratch state; `f` receives that state, the
/// span, and the destination pixels of the span. Regions are assumed to be
/// validated (see [`validate`]) and disjoint; empty regions are skipped.
pub fn for_each_span<S, I, F>(
    dst: &mut Surface,
    rois: &[Rect],
    ctx: &RenderContext,
    init: I,
    f: F,
) -> RenderStatus
where
    I: Fn() -> S + Send + Sync,
    F: Fn(&mut S, Span, &mut [ColorBgra]) + Send + Sync,
{
    let rois: Vec<Rect> = rois.iter().copied().filter(|r| !r.is_empty()).collect();
    if rois.is_empty() {
        return RenderStatus::Completed;
    }
    trace!(regions = rois.len(), parallel = ctx.parallel, "for_each_span");

    let top = rois.iter().map(Rect::top).min().unwrap_or(0);
    let bottom = rois.iter().map(Rect::bottom).max().unwrap_or(-1);

    let visit_row = |state: &mut S, y: i32, row: &mut [ColorBgra]| {
        for roi in rois.iter().filter(|r| r.top() <= y && y <= r.bottom()) {
            let span = Span {
                y,
                x0: roi.left(),
                x1: roi.right(),
            };
            f(state, span, &mut row[span.x0 as usize..=span.x1 as usize]);
        }
    };

    #[cfg(feature = "parallel")]
    if ctx.parallel {
        let skipped = AtomicBool::new(false);
        dst.par_rows_mut()
            .filter(|(y, _)| *y >= top && *y <= bottom)
            .for_each_init(&init, |state, (y, row)| {
                if ctx.cancel.is_cancelled() {
                    skipped.store(true, Ordering::Relaxed);
                    return;
                }
                visit_row(state, y, row);
            });
        return finish(skipped.into_inner());
    }

    let mut state = init();
    let mut skipped = false;
    for (y, row) in dst.rows_mut().filter(|(y, _)| *y >= top && *y <= bottom) {
        if ctx.cancel.is_cancelled() {
            skipped = true;
            break;
        }
        visit_row(&mut state, y, row);
    }
    finish(skipped)
}

/// `Cancelled` only if cancellation actually left rows unwritten.
fn finish(skipped: bool) -> RenderStatus {
    if skipped {
        warn!("render cancelled");
        RenderStatus::Cancelled
    } else {
        RenderStatus::Completed
    }
}
