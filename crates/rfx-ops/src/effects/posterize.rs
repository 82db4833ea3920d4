//! Posterize adjustment.

use crate::effect::{not_configurable, ConfigDialog, Effect};
use crate::params::{expect_int, unknown, EffectParameters, ParamDescriptor, ParamValue};
use crate::pixel_ops::{PosterizePixel, UnaryPixelOp, POSTERIZE_MAX_LEVELS, POSTERIZE_MIN_LEVELS};
use crate::render::{RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{Rect, Surface};
use tracing::debug;

const MIN: i32 = POSTERIZE_MIN_LEVELS as i32;
const MAX: i32 = POSTERIZE_MAX_LEVELS as i32;

const DESCRIPTORS: &[ParamDescriptor] = &[
    ParamDescriptor::int("red", "Red", MIN, MAX),
    ParamDescriptor::int("green", "Green", MIN, MAX),
    ParamDescriptor::int("blue", "Blue", MIN, MAX),
];

/// Parameters of [`PosterizeEffect`]: level counts per color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PosterizeData {
    /// Red levels.
    pub red: i32,
    /// Green levels.
    pub green: i32,
    /// Blue levels.
    pub blue: i32,
}

impl Default for PosterizeData {
    fn default() -> Self {
        Self::uniform(16)
    }
}

impl PosterizeData {
    /// Same level count for every channel.
    pub fn uniform(levels: i32) -> Self {
        Self {
            red: levels,
            green: levels,
            blue: levels,
        }
    }
}

impl EffectParameters for PosterizeData {
    fn record_name(&self) -> &'static str {
        "PosterizeData"
    }

    fn descriptors(&self) -> &'static [ParamDescriptor] {
        DESCRIPTORS
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        match name {
            "red" => Some(ParamValue::Int(self.red)),
            "green" => Some(ParamValue::Int(self.green)),
            "blue" => Some(ParamValue::Int(self.blue)),
            _ => None,
        }
    }

    fn store(&mut self, name: &str, value: ParamValue) -> OpsResult<()> {
        let record = self.record_name();
        let v = expect_int(record, name, value)?;
        match name {
            "red" => self.red = v,
            "green" => self.green = v,
            "blue" => self.blue = v,
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

/// Quantizes color channels to a few levels.
///
/// Like levels, posterize has a bespoke dialog (linked channel sliders), so
/// [`launch_configuration`](Effect::launch_configuration) always reports
/// `NotImplemented`.
#[derive(Debug, Clone)]
pub struct PosterizeEffect {
    data: PosterizeData,
    op: PosterizePixel,
}

impl PosterizeEffect {
    /// Compiles `data`.
    pub fn new(data: PosterizeData) -> Self {
        let level = |n: i32| n.max(0) as u32;
        Self {
            op: PosterizePixel::new(level(data.red), level(data.green), level(data.blue)),
            data,
        }
    }

    /// Current parameters.
    pub fn data(&self) -> &PosterizeData {
        &self.data
    }

    /// Replaces the parameters and recompiles.
    pub fn set_data(&mut self, data: PosterizeData) {
        *self = Self::new(data);
    }
}

impl Default for PosterizeEffect {
    fn default() -> Self {
        Self::new(PosterizeData::default())
    }
}

impl Effect for PosterizeEffect {
    fn name(&self) -> &'static str {
        "Posterize"
    }

    fn parameters(&self) -> &dyn EffectParameters {
        &self.data
    }

    fn render_with(
        &self,
        src: &Surface,
        dst: &mut Surface,
        rois: &[Rect],
        ctx: &RenderContext,
    ) -> OpsResult<RenderStatus> {
        self.data.validate()?;
        debug!(red = self.data.red, green = self.data.green, blue = self.data.blue, regions = rois.len(), "posterize");
        self.op.apply_to(src, dst, rois, ctx)
    }

    fn launch_configuration(&mut self, _dialog: Option<&dyn ConfigDialog>) -> OpsResult<bool> {
        Err(not_configurable(self.name()))
    }
}
