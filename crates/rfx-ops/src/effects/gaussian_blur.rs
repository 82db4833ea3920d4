//! Gaussian blur approximation with triangular integer weights.
//!
//! Row weights are `16 * (i + 1)` rising to the center and mirrored, so a
//! radius-2 row is `[16, 32, 48, 32, 16]`. The 2-D weight of a tap is the
//! product of its row and column weights. Color channels are weighted by
//! alpha as well, so transparent pixels do not bleed color. Taps outside the
//! surface are dropped and the remaining weights renormalized.

use crate::effect::{edit_with_dialog, ConfigDialog, Effect};
use crate::params::{expect_int, unknown, EffectParameters, ParamDescriptor, ParamValue};
use crate::render::{for_each_span, validate, RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{ColorBgra, Rect, Surface};
use tracing::debug;

const DESCRIPTORS: &[ParamDescriptor] = &[ParamDescriptor::int("radius", "Radius", 0, 200)];

/// Parameters of [`GaussianBlurEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaussianBlurData {
    /// Blur radius; 0 copies the source.
    pub radius: i32,
}

impl Default for GaussianBlurData {
    fn default() -> Self {
        Self { radius: 2 }
    }
}

impl EffectParameters for GaussianBlurData {
    fn record_name(&self) -> &'static str {
        "GaussianBlurData"
    }

    fn descriptors(&self) -> &'static [ParamDescriptor] {
        DESCRIPTORS
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        (name == "radius").then_some(ParamValue::Int(self.radius))
    }

    fn store(&mut self, name: &str, value: ParamValue) -> OpsResult<()> {
        let record = self.record_name();
        match name {
            "radius" => self.radius = expect_int(record, name, value)?,
            _ => return Err(unknown(record, name)),
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn EffectParameters> {
        Box::new(*self)
    }

    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Triangular row weights for `radius`.
pub fn blur_weights(radius: u32) -> Vec<u64> {
    let r = radius as u64;
    (0..=2 * r).map(|i| 16 * (r.min(i).min(2 * r - i) + 1)).collect()
}

/// Alpha-weighted blur.
#[derive(Debug, Clone)]
pub struct GaussianBlurEffect {
    data: GaussianBlurData,
    weights: Vec<u64>,
}

impl GaussianBlurEffect {
    /// Compiles the weight row for `data`.
    pub fn new(data: GaussianBlurData) -> Self {
        Self {
            weights: blur_weights(data.radius.max(0) as u32),
            data,
        }
    }

    /// Shorthand for a given radius.
    pub fn with_radius(radius: i32) -> Self {
        Self::new(GaussianBlurData { radius })
    }

    /// Current parameters.
    pub fn data(&self) -> &GaussianBlurData {
        &self.data
    }

    /// Replaces the parameters and recompiles.
    pub fn set_data(&mut self, data: GaussianBlurData) {
        *self = Self::new(data);
    }

    fn blur_pixel(&self, src: &Surface, x: i32, y: i32) -> ColorBgra {
        let r = (self.weights.len() / 2) as i32;
        let (w, h) = src.dimensions();
        let (mut wsum, mut asum) = (0u64, 0u64);
        let (mut bsum, mut gsum, mut rsum) = (0u64, 0u64, 0u64);

        for sy in (y - r).max(0)..=(y + r).min(h - 1) {
            let wy = self.weights[(sy - y + r) as usize];
            let row = src.row(sy);
            for sx in (x - r).max(0)..=(x + r).min(w - 1) {
                let wt = wy * self.weights[(sx - x + r) as usize];
                let c = row[sx as usize];
                let wa = wt * c.a as u64;
                wsum += wt;
                asum += wa;
                bsum += wa * c.b as u64;
                gsum += wa * c.g as u64;
                rsum += wa * c.r as u64;
            }
        }

        if asum == 0 || wsum == 0 {
            return ColorBgra::TRANSPARENT;
        }
        ColorBgra::from_bgra(
            (bsum / asum) as u8,
            (gsum / asum) as u8,
            (rsum / asum) as u8,
            (asum / wsum) as u8,
        )
    }
}

impl Default for GaussianBlurEffect {
    fn default() -> Self {
        Self::new(GaussianBlurData::default())
    }
}

impl Effect for GaussianBlurEffect {
    fn name(&self) -> &'static str {
        "Gaussian Blur"
    }

    fn parameters(&self) -> &dyn EffectParameters {
        &self.data
    }

    fn read_margin(&self) -> i32 {
        self.data.radius.max(0)
    }

    fn render_with(
        &self,
        src: &Surface,
        dst: &mut Surface,
        rois: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        self.data.validate()?;
        validate(src, dst, rois)?;
        debug!(radius = self.data.radius, regions = rois.len(), "gaussian blur");
        if self.data.radius == 0 {
            for roi in rois {
                dst.copy_region_from(src, roi)?;
            }
            return Ok(RenderStatus::Completed);
        }
        Ok(for_each_span(dst, rois, ctx, || (), |_, span, out| {
            for (x, slot) in (span.x0..=span.x1).zip(out.iter_mut()) {
                *slot = self.blur_pixel(src, x, span.y);
            }
        }))
    }

    fn launch_configuration(&mut self, dialog: Option<&dyn ConfigDialog>) -> OpsResult<bool> {
        match edit_with_dialog(self.name(), dialog, &self.data)? {
            Some(data) => {
                self.set_data(data);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
