//! Ordered multi-stage effects.
//!
//! A [`Pipeline`] runs its stages strictly in order. Each stage states what
//! it reads:
//!
//! - [`Stage::FromSource`] - an effect reading the pipeline's original source
//! - [`Stage::FromPrevious`] - an effect reading the previous stage's output
//! - [`Stage::BlendSource`] - a per-pixel operator applied to the original
//!   source, blended over the previous stage's output
//!
//! For the first stage "previous" means the original source.
//!
//! # Regions
//!
//! Only the last stage writes the destination, and only inside the
//! requested regions. Earlier stages write pooled scratch surfaces over
//! the area the following stage reads: the same regions behind a per-pixel
//! stage, the regions grown by [`Effect::read_margin`] (clipped to the
//! surface) behind a neighborhood stage, nothing behind a `FromSource`
//! stage. Every pixel a stage reads was therefore computed from the source
//! in this call, so rendering tiles separately gives the same pixels as
//! rendering their union at once.
//!
//! Stages are never reordered or fused.

use crate::blend::BinaryPixelOp;
use crate::effect::Effect;
use crate::pixel_ops::UnaryPixelOp;
use crate::render::{for_each_span, validate, RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{Rect, Surface};
use std::sync::Mutex;
use tracing::{debug, trace};

/// Scratch surfaces kept between renders.
const SCRATCH_POOL: usize = 2;

/// One pipeline step.
pub enum Stage {
    /// Render an effect from the original source.
    FromSource(Box<dyn Effect>),
    /// Render an effect from the previous stage's output.
    FromPrevious(Box<dyn Effect>),
    /// `blend(bottom = op(source), top = previous)`.
    BlendSource {
        /// Applied to the original source pixel.
        source_op: Box<dyn UnaryPixelOp>,
        /// Combines the transformed source (bottom) with the previous output (top).
        blend: Box<dyn BinaryPixelOp>,
    },
}

impl Stage {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FromSource(e) | Self::FromPrevious(e) => e.name(),
            Self::BlendSource { .. } => "blend-source",
        }
    }

    /// Runs the stage over `regions` of `out`.
    fn run(
        &self,
        src: &Surface,
        previous: &Surface,
        out: &mut Surface,
        regions: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        match self {
            Self::FromSource(effect) => effect.render_with(src, out, regions, ctx),
            Self::FromPrevious(effect) => effect.render_with(previous, out, regions, ctx),
            Self::BlendSource { source_op, blend } => {
                for roi in regions {
                    out.copy_region_from(previous, roi)?;
                }
                Ok(for_each_span(out, regions, ctx, || (), |_, span, row| {
                    let under = &src.row(span.y)[span.x0 as usize..=span.x1 as usize];
                    for (d, &s) in row.iter_mut().zip(under) {
                        *d = blend.apply(source_op.apply(s), *d);
                    }
                }))
            }
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FromSource(e) => f.debug_tuple("FromSource").field(&e.name()).finish(),
            Self::FromPrevious(e) => f.debug_tuple("FromPrevious").field(&e.name()).finish(),
            Self::BlendSource { .. } => f.write_str("BlendSource"),
        }
    }
}

/// Ordered list of stages.
#[derive(Debug, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
    scratch: Mutex<Vec<Surface>>,
}

impl Pipeline {
    /// Empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Appends an effect reading the original source.
    pub fn from_source(self, effect: impl Effect + 'static) -> Self {
        self.then(Stage::FromSource(Box::new(effect)))
    }

    /// Appends an effect reading the previous output.
    pub fn from_previous(self, effect: impl Effect + 'static) -> Self {
        self.then(Stage::FromPrevious(Box::new(effect)))
    }

    /// Appends a blend of the transformed source under the previous output.
    pub fn blend_source(self, source_op: impl UnaryPixelOp + 'static, blend: impl BinaryPixelOp + 'static) -> Self {
        self.then(Stage::BlendSource {
            source_op: Box::new(source_op),
            blend: Box::new(blend),
        })
    }

    /// The stages, in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// `true` if there are no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// How far outside an output pixel the whole pipeline reads the source.
    pub fn read_margin(&self) -> i32 {
        self.stages.iter().fold(0, |reach, stage| match stage {
            Stage::FromSource(effect) => effect.read_margin(),
            Stage::FromPrevious(effect) => reach + effect.read_margin(),
            Stage::BlendSource { .. } => reach,
        })
    }

    /// Output regions of every stage, worked backwards from `rois`.
    fn stage_regions(&self, rois: &[Rect], width: i32, height: i32) -> Vec<Vec<Rect>> {
        let count = self.stages.len();
        let mut regions = vec![Vec::new(); count];
        if count == 0 {
            return regions;
        }
        regions[count - 1] = rois.iter().copied().filter(|r| !r.is_empty()).collect();

        for i in (1..count).rev() {
            let needed = match &self.stages[i] {
                Stage::FromSource(_) => Vec::new(),
                Stage::BlendSource { .. } => regions[i].clone(),
                Stage::FromPrevious(effect) => {
                    let margin = effect.read_margin().max(0);
                    let grown: Vec<Rect> = regions[i]
                        .iter()
                        .filter_map(|r| r.inflate(margin).clamp_to(width, height))
                        .collect();
                    Rect::disjoint_cover(&grown)
                }
            };
            regions[i - 1] = needed;
        }
        regions
    }

    fn take_scratch(&self, width: i32, height: i32) -> Surface {
        let reused = self.scratch.lock().ok().and_then(|mut pool| {
            let i = pool.iter().position(|s| s.dimensions() == (width, height))?;
            Some(pool.swap_remove(i))
        });
        reused.unwrap_or_else(|| Surface::new(width, height))
    }

    fn recycle(&self, surface: Surface) {
        if surface.is_empty() {
            return;
        }
        if let Ok(mut pool) = self.scratch.lock() {
            if pool.len() >= SCRATCH_POOL {
                pool.remove(0);
            }
            pool.push(surface);
        }
    }

    /// Runs every stage over `rois`.
    ///
    /// An empty pipeline copies the source regions. Stops at the first
    /// cancelled stage. Pixels of `dst` outside `rois` are never written.
    ///
    /// # Errors
    ///
    /// Size or region errors, and any error raised by a stage.
    pub fn render_with(
        &self,
        src: &Surface,
        dst: &mut Surface,
        rois: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        validate(src, dst, rois)?;
        if self.stages.is_empty() {
            for roi in rois {
                dst.copy_region_from(src, roi)?;
            }
            return Ok(RenderStatus::Completed);
        }

        let (width, height) = src.dimensions();
        let regions = self.stage_regions(rois, width, height);
        let last = self.stages.len() - 1;
        let mut back = if last >= 1 { self.take_scratch(width, height) } else { Surface::new(0, 0) };
        let mut front = if last >= 2 { self.take_scratch(width, height) } else { Surface::new(0, 0) };

        let result = self.run_stages(src, dst, &regions, &mut front, &mut back, ctx);
        self.recycle(front);
        self.recycle(back);
        result
    }

    /// `front` holds the previous stage's output, `back` receives the next.
    fn run_stages(
        &self,
        src: &Surface,
        dst: &mut Surface,
        regions: &[Vec<Rect>],
        front: &mut Surface,
        back: &mut Surface,
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        let last = self.stages.len() - 1;
        for (index, (stage, stage_regions)) in self.stages.iter().zip(regions).enumerate() {
            if ctx.cancel.is_cancelled() {
                return Ok(RenderStatus::Cancelled);
            }
            trace!(index, stage = stage.label(), regions = stage_regions.len(), "pipeline stage");

            let previous: &Surface = if index == 0 { src } else { &*front };
            let status = if index == last {
                stage.run(src, previous, dst, stage_regions, ctx)?
            } else {
                stage.run(src, previous, back, stage_regions, ctx)?
            };
            if status == RenderStatus::Cancelled {
                debug!(index, "pipeline cancelled");
                return Ok(status);
            }
            std::mem::swap(front, back);
        }
        Ok(RenderStatus::Completed)
    }
}
