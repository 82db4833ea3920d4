//! Median / percentile filter.

use crate::effect::{edit_with_dialog, ConfigDialog, Effect};
use crate::histogram::{LocalHistogramEngine, PercentileQuery};
use crate::params::{expect_int, unknown, EffectParameters, ParamDescriptor, ParamValue};
use crate::render::{RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{Rect, Surface};
use tracing::debug;

const DESCRIPTORS: &[ParamDescriptor] = &[
    ParamDescriptor::int("radius", "Radius", 1, 200),
    ParamDescriptor::int("percentile", "Percentile", 0, 100),
];

/// Parameters of [`MedianEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MedianData {
    /// Neighborhood radius, 1..=200.
    pub radius: i32,
    /// Percentile to pick, 0..=100. 50 is the median.
    pub percentile: i32,
}

impl Default for MedianData {
    fn default() -> Self {
        Self {
            radius: 10,
            percentile: 50,
        }
    }
}

impl EffectParameters for MedianData {
    fn record_name(&self) -> &'static str {
        "MedianData"
    }

    fn descriptors(&self) -> &'static [ParamDescriptor] {
        DESCRIPTORS
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        match name {
            "radius" => Some(ParamValue::Int(self.radius)),
            "percentile" => Some(ParamValue::Int(self.percentile)),
            _ => None,
        }
    }

    fn store(&mut self, name: &str, value: ParamValue) -> OpsResult<()> {
        let record = self.record_name();
        match name {
            "radius" => self.radius = expect_int(record, name, value)?,
            "percentile" => self.percentile = expect_int(record, name, value)?,
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

/// Replaces every channel with a percentile of its circular neighborhood.
#[derive(Debug, Clone)]
pub struct MedianEffect {
    data: MedianData,
    engine: LocalHistogramEngine,
    query: PercentileQuery,
}

impl MedianEffect {
    /// Compiles the kernel for `data`.
    pub fn new(data: MedianData) -> Self {
        Self {
            data,
            engine: LocalHistogramEngine::with_radius(data.radius.max(0) as u32),
            query: PercentileQuery::new(data.percentile.max(0) as u32),
        }
    }

    /// Current parameters.
    pub fn data(&self) -> &MedianData {
        &self.data
    }

    /// Replaces the parameters and recompiles.
    pub fn set_data(&mut self, data: MedianData) {
        *self = Self::new(data);
    }
}

impl Default for MedianEffect {
    fn default() -> Self {
        Self::new(MedianData::default())
    }
}

impl Effect for MedianEffect {
    fn name(&self) -> &'static str {
        "Median"
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
        debug!(radius = self.data.radius, percentile = self.data.percentile, regions = rois.len(), "median");
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

#[cfg(test)]
mod tests {
    use super::*;
    use rfx_core::ColorBgra;

    fn checkerboard(n: i32) -> Surface {
        Surface::from_fn(n, n, |x, y| if (x + y) % 2 == 0 { ColorBgra::BLACK } else { ColorBgra::WHITE })
    }

    #[test]
    fn test_checkerboard_radius_one_inverts() {
        // Radius 1 is a plus shape: the four edge neighbors always outvote
        // the center, including clipped edge (4) and corner (3) footprints.
        let src = checkerboard(5);
        let mut dst = Surface::new(5, 5);
        let effect = MedianEffect::new(MedianData { radius: 1, percentile: 50 });
        effect.render(&src, &mut dst, &[src.bounds()]).unwrap();
        for (x, y) in src.bounds().iter_coords() {
            let expected = if src.pixel(x, y) == ColorBgra::BLACK { ColorBgra::WHITE } else { ColorBgra::BLACK };
            assert_eq!(dst.pixel(x, y), expected, "({x}, {y})");
        }
    }

    #[test]
    fn test_percentile_extremes() {
        let src = Surface::from_fn(9, 9, |x, _| ColorBgra::gray((x * 20) as u8));
        let mut lo = Surface::new(9, 9);
        let mut hi = Surface::new(9, 9);
        MedianEffect::new(MedianData { radius: 2, percentile: 0 }).render(&src, &mut lo, &[src.bounds()]).unwrap();
        MedianEffect::new(MedianData { radius: 2, percentile: 100 }).render(&src, &mut hi, &[src.bounds()]).unwrap();
        // Row 4: x in [2, 6] sees columns x-2..=x+2.
        for x in 2..=6 {
            assert_eq!(lo.pixel(x, 4).r, ((x - 2) * 20) as u8);
            assert_eq!(hi.pixel(x, 4).r, ((x + 2) * 20) as u8);
        }
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let src = Surface::new(3, 3);
        let mut dst = Surface::new(3, 3);
        let effect = MedianEffect::new(MedianData { radius: 0, percentile: 50 });
        assert!(effect.render(&src, &mut dst, &[src.bounds()]).is_err());
    }

    #[test]
    fn test_params_roundtrip() {
        let mut data = MedianData::default();
        assert!(data.is_default());
        data.set("radius", ParamValue::Int(3)).unwrap();
        assert_eq!(data.get("radius"), Some(ParamValue::Int(3)));
        assert!(data.set("radius", ParamValue::Int(201)).is_err());
        assert!(data.set("sigma", ParamValue::Int(1)).is_err());
        assert!(!data.is_default());
    }

    #[test]
    fn test_launch_without_dialog() {
        let mut effect = MedianEffect::default();
        let err = effect.launch_configuration(None).unwrap_err();
        assert!(err.is_not_implemented());
    }
}
