//! Rank-based noise reduction on the local histogram engine.
//!
//! Each color channel is replaced by its rank inside the neighborhood,
//! scaled to `0..=255`, then blended back toward the source. Dark pixels
//! are pulled harder than bright ones: the blend factor is
//! `strength * (1 - 0.75 * intensity)`.

use crate::effect::{edit_with_dialog, ConfigDialog, Effect};
use crate::histogram::{HistogramQuery, HistogramState, LocalHistogramEngine};
use crate::params::{expect_float, expect_int, unknown, EffectParameters, ParamDescriptor, ParamValue};
use crate::render::{RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{ColorBgra, Rect, Surface};
use tracing::debug;

const DESCRIPTORS: &[ParamDescriptor] = &[
    ParamDescriptor::int("radius", "Radius", 0, 200),
    ParamDescriptor::float("strength", "Strength", 0.0, 1.0),
];

/// Parameters of [`ReduceNoiseEffect`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReduceNoiseData {
    /// Neighborhood radius.
    pub radius: i32,
    /// Blend strength in `[0, 1]`.
    pub strength: f64,
}

impl Default for ReduceNoiseData {
    fn default() -> Self {
        Self {
            radius: 6,
            strength: 0.4,
        }
    }
}

impl EffectParameters for ReduceNoiseData {
    fn record_name(&self) -> &'static str {
        "ReduceNoiseData"
    }

    fn descriptors(&self) -> &'static [ParamDescriptor] {
        DESCRIPTORS
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        match name {
            "radius" => Some(ParamValue::Int(self.radius)),
            "strength" => Some(ParamValue::Float(self.strength)),
            _ => None,
        }
    }

    fn store(&mut self, name: &str, value: ParamValue) -> OpsResult<()> {
        let record = self.record_name();
        match name {
            "radius" => self.radius = expect_int(record, name, value)?,
            "strength" => self.strength = expect_float(record, name, value)?,
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

/// Rank-normalizes the center pixel against its neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReduceNoiseQuery {
    strength: f64,
}

impl ReduceNoiseQuery {
    /// `strength` is clamped to `[0, 1]`.
    pub fn new(strength: f64) -> Self {
        let strength = if strength.is_nan() { 0.0 } else { strength.clamp(0.0, 1.0) };
        Self { strength }
    }
}

impl HistogramQuery for ReduceNoiseQuery {
    fn apply(&self, center: ColorBgra, hist: &HistogramState) -> ColorBgra {
        let area = hist.area();
        if area == 0 {
            return center;
        }
        let mut ranked = center;
        for ch in 0..3 {
            let rank = hist.rank_below(ch, center.channel(ch)) as u64;
            ranked.set_channel(ch, (rank * 255 / area as u64) as u8);
        }
        let t = self.strength * (1.0 - 0.75 * center.intensity());
        ColorBgra::lerp(center, ranked, t)
    }
}

/// Noise reduction by local rank.
#[derive(Debug, Clone)]
pub struct ReduceNoiseEffect {
    data: ReduceNoiseData,
    engine: LocalHistogramEngine,
    query: ReduceNoiseQuery,
}

impl ReduceNoiseEffect {
    /// Compiles the kernel for `data`.
    pub fn new(data: ReduceNoiseData) -> Self {
        Self {
            data,
            engine: LocalHistogramEngine::with_radius(data.radius.max(0) as u32),
            query: ReduceNoiseQuery::new(data.strength),
        }
    }

    /// Current parameters.
    pub fn data(&self) -> &ReduceNoiseData {
        &self.data
    }

    /// Replaces the parameters and recompiles.
    pub fn set_data(&mut self, data: ReduceNoiseData) {
        *self = Self::new(data);
    }
}

impl Default for ReduceNoiseEffect {
    fn default() -> Self {
        Self::new(ReduceNoiseData::default())
    }
}

impl Effect for ReduceNoiseEffect {
    fn name(&self) -> &'static str {
        "Reduce Noise"
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
        debug!(radius = self.data.radius, strength = self.data.strength, regions = rois.len(), "reduce noise");
        self.engine.render(src, dst, rois, &self.query, ctx)
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
