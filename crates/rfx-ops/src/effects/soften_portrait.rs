//! Soften portrait: blur, tone down contrast, overlay a warm gray.
//!
//! Three pipeline stages over the same regions:
//!
//! 1. Gaussian blur of the source, radius `softness * 3`.
//! 2. Brightness/contrast of stage 1's output: brightness `lighting`,
//!    contrast `-softness * 2`.
//! 3. The desaturated source, tinted by `warmth` (red up, blue down), is
//!    the bottom layer; stage 2's output is overlaid on top.

use crate::blend::BlendOp;
use crate::effect::{edit_with_dialog, ConfigDialog, Effect};
use crate::effects::brightness_contrast::{BrightnessContrastData, BrightnessContrastEffect};
use crate::effects::gaussian_blur::GaussianBlurEffect;
use crate::params::{expect_int, unknown, EffectParameters, ParamDescriptor, ParamValue};
use crate::pipeline::Pipeline;
use crate::pixel_ops::{ChannelMultiply, Chain, Desaturate};
use crate::render::{RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{Rect, Surface};
use tracing::debug;

const DESCRIPTORS: &[ParamDescriptor] = &[
    ParamDescriptor::int("softness", "Softness", 0, 10),
    ParamDescriptor::int("lighting", "Lighting", -20, 20),
    ParamDescriptor::int("warmth", "Warmth", 0, 20),
];

/// Parameters of [`SoftenPortraitEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoftenPortraitData {
    /// Blur amount, 0..=10.
    pub softness: i32,
    /// Brightness shift, -20..=20.
    pub lighting: i32,
    /// Warm tint, 0..=20.
    pub warmth: i32,
}

impl Default for SoftenPortraitData {
    fn default() -> Self {
        Self {
            softness: 5,
            lighting: 0,
            warmth: 10,
        }
    }
}

impl EffectParameters for SoftenPortraitData {
    fn record_name(&self) -> &'static str {
        "SoftenPortraitData"
    }

    fn descriptors(&self) -> &'static [ParamDescriptor] {
        DESCRIPTORS
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        match name {
            "softness" => Some(ParamValue::Int(self.softness)),
            "lighting" => Some(ParamValue::Int(self.lighting)),
            "warmth" => Some(ParamValue::Int(self.warmth)),
            _ => None,
        }
    }

    fn store(&mut self, name: &str, value: ParamValue) -> OpsResult<()> {
        let record = self.record_name();
        let v = expect_int(record, name, value)?;
        match name {
            "softness" => self.softness = v,
            "lighting" => self.lighting = v,
            "warmth" => self.warmth = v,
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

/// Portrait softening pipeline.
#[derive(Debug)]
pub struct SoftenPortraitEffect {
    data: SoftenPortraitData,
    pipeline: Pipeline,
}

impl SoftenPortraitEffect {
    /// Builds the stage list for `data`.
    pub fn new(data: SoftenPortraitData) -> Self {
        Self {
            pipeline: Self::build_pipeline(&data),
            data,
        }
    }

    fn build_pipeline(data: &SoftenPortraitData) -> Pipeline {
        let blur = GaussianBlurEffect::with_radius(data.softness.max(0) * 3);
        let tone = BrightnessContrastEffect::new(BrightnessContrastData {
            brightness: data.lighting,
            contrast: -data.softness * 2,
        });
        let warm_gray = Chain::new()
            .then(Desaturate)
            .then(ChannelMultiply::warmth(data.warmth as f32));
        Pipeline::new()
            .from_source(blur)
            .from_previous(tone)
            .blend_source(warm_gray, BlendOp::overlay())
    }

    /// Current parameters.
    pub fn data(&self) -> &SoftenPortraitData {
        &self.data
    }

    /// Replaces the parameters and rebuilds the stages.
    pub fn set_data(&mut self, data: SoftenPortraitData) {
        *self = Self::new(data);
    }

    /// The compiled stages.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl Default for SoftenPortraitEffect {
    fn default() -> Self {
        Self::new(SoftenPortraitData::default())
    }
}

impl Effect for SoftenPortraitEffect {
    fn name(&self) -> &'static str {
        "Soften Portrait"
    }

    fn parameters(&self) -> &dyn EffectParameters {
        &self.data
    }

    fn read_margin(&self) -> i32 {
        self.pipeline.read_margin()
    }

    fn render_with(
        &self,
        src: &Surface,
        dst: &mut Surface,
        rois: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        self.data.validate()?;
        debug!(
            softness = self.data.softness,
            lighting = self.data.lighting,
            warmth = self.data.warmth,
            regions = rois.len(),
            "soften portrait"
        );
        self.pipeline.render_with(src, dst, rois, ctx)
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
