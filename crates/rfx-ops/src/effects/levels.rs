//! Levels adjustment.

use crate::effect::{not_configurable, ConfigDialog, Effect};
use crate::level::{Level, GAMMA_MAX, GAMMA_MIN};
use crate::params::{expect_color, expect_float, unknown, EffectParameters, ParamDescriptor, ParamValue};
use crate::pixel_ops::UnaryPixelOp;
use crate::render::{RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{ColorBgra, Rect, Surface};
use tracing::debug;

const DESCRIPTORS: &[ParamDescriptor] = &[
    ParamDescriptor::color("input_low", "Input Low"),
    ParamDescriptor::color("input_high", "Input High"),
    ParamDescriptor::color("output_low", "Output Low"),
    ParamDescriptor::color("output_high", "Output High"),
    ParamDescriptor::float("gamma_red", "Red Gamma", GAMMA_MIN as f64, GAMMA_MAX as f64),
    ParamDescriptor::float("gamma_green", "Green Gamma", GAMMA_MIN as f64, GAMMA_MAX as f64),
    ParamDescriptor::float("gamma_blue", "Blue Gamma", GAMMA_MIN as f64, GAMMA_MAX as f64),
];

/// Parameters of [`LevelsEffect`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelsData {
    /// Input black point.
    pub input_low: ColorBgra,
    /// Input white point.
    pub input_high: ColorBgra,
    /// Output black point.
    pub output_low: ColorBgra,
    /// Output white point.
    pub output_high: ColorBgra,
    /// Red gamma.
    pub gamma_red: f64,
    /// Green gamma.
    pub gamma_green: f64,
    /// Blue gamma.
    pub gamma_blue: f64,
}

impl Default for LevelsData {
    fn default() -> Self {
        Self {
            input_low: ColorBgra::BLACK,
            input_high: ColorBgra::WHITE,
            output_low: ColorBgra::BLACK,
            output_high: ColorBgra::WHITE,
            gamma_red: 1.0,
            gamma_green: 1.0,
            gamma_blue: 1.0,
        }
    }
}

impl LevelsData {
    /// Compiles the lookup-table operator.
    pub fn compile(&self) -> Level {
        Level::new(
            self.input_low,
            self.input_high,
            [self.gamma_blue as f32, self.gamma_green as f32, self.gamma_red as f32],
            self.output_low,
            self.output_high,
        )
    }
}

impl EffectParameters for LevelsData {
    fn record_name(&self) -> &'static str {
        "LevelsData"
    }

    fn descriptors(&self) -> &'static [ParamDescriptor] {
        DESCRIPTORS
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        Some(match name {
            "input_low" => ParamValue::Color(self.input_low),
            "input_high" => ParamValue::Color(self.input_high),
            "output_low" => ParamValue::Color(self.output_low),
            "output_high" => ParamValue::Color(self.output_high),
            "gamma_red" => ParamValue::Float(self.gamma_red),
            "gamma_green" => ParamValue::Float(self.gamma_green),
            "gamma_blue" => ParamValue::Float(self.gamma_blue),
            _ => return None,
        })
    }

    fn store(&mut self, name: &str, value: ParamValue) -> OpsResult<()> {
        let record = self.record_name();
        match name {
            "input_low" => self.input_low = expect_color(record, name, value)?,
            "input_high" => self.input_high = expect_color(record, name, value)?,
            "output_low" => self.output_low = expect_color(record, name, value)?,
            "output_high" => self.output_high = expect_color(record, name, value)?,
            "gamma_red" => self.gamma_red = expect_float(record, name, value)?,
            "gamma_green" => self.gamma_green = expect_float(record, name, value)?,
            "gamma_blue" => self.gamma_blue = expect_float(record, name, value)?,
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

/// Applies a [`Level`] remap.
///
/// The levels editor is a dedicated histogram dialog, so
/// [`launch_configuration`](Effect::launch_configuration) always reports
/// `NotImplemented`.
#[derive(Debug, Clone)]
pub struct LevelsEffect {
    data: LevelsData,
    level: Level,
}

impl LevelsEffect {
    /// Compiles `data`.
    pub fn new(data: LevelsData) -> Self {
        Self {
            level: data.compile(),
            data,
        }
    }

    /// Current parameters.
    pub fn data(&self) -> &LevelsData {
        &self.data
    }

    /// Replaces the parameters and recompiles.
    pub fn set_data(&mut self, data: LevelsData) {
        *self = Self::new(data);
    }

    /// The compiled operator.
    pub fn level(&self) -> &Level {
        &self.level
    }
}

impl Default for LevelsEffect {
    fn default() -> Self {
        Self::new(LevelsData::default())
    }
}

impl Effect for LevelsEffect {
    fn name(&self) -> &'static str {
        "Levels"
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
        debug!(level = ?self.level, regions = rois.len(), "levels");
        self.level.apply_to(src, dst, rois, ctx)
    }

    fn launch_configuration(&mut self, _dialog: Option<&dyn ConfigDialog>) -> OpsResult<bool> {
        Err(not_configurable(self.name()))
    }
}
