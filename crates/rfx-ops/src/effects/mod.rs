//! Concrete effects.
//!
//! | effect | kind | engine |
//! |--------|------|--------|
//! | [`MedianEffect`] | neighborhood | [`LocalHistogramEngine`](crate::histogram::LocalHistogramEngine) |
//! | [`ReduceNoiseEffect`] | neighborhood | [`LocalHistogramEngine`](crate::histogram::LocalHistogramEngine) |
//! | [`GaussianBlurEffect`] | neighborhood | direct weighted sum |
//! | [`LevelsEffect`] | per pixel | [`Level`](crate::level::Level) |
//! | [`PosterizeEffect`] | per pixel | [`PosterizePixel`](crate::pixel_ops::PosterizePixel) |
//! | [`BrightnessContrastEffect`] | per pixel | [`BrightnessContrast`] |
//! | [`SoftenPortraitEffect`] | pipeline | [`Pipeline`](crate::pipeline::Pipeline) |
//!
//! [`EffectKind`] enumerates them for hosts that select effects by name.

pub mod brightness_contrast;
pub mod gaussian_blur;
pub mod levels;
pub mod median;
pub mod posterize;
pub mod reduce_noise;
pub mod soften_portrait;

pub use brightness_contrast::{BrightnessContrast, BrightnessContrastData, BrightnessContrastEffect};
pub use gaussian_blur::{GaussianBlurData, GaussianBlurEffect};
pub use levels::{LevelsData, LevelsEffect};
pub use median::{MedianData, MedianEffect};
pub use posterize::{PosterizeData, PosterizeEffect};
pub use reduce_noise::{ReduceNoiseData, ReduceNoiseEffect, ReduceNoiseQuery};
pub use soften_portrait::{SoftenPortraitData, SoftenPortraitEffect};

use crate::effect::Effect;
use crate::params::{EffectParameters, ParamValue};
use crate::OpsResult;
use std::fmt;
use std::str::FromStr;

/// The closed set of built-in effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// [`MedianEffect`].
    Median,
    /// [`ReduceNoiseEffect`].
    ReduceNoise,
    /// [`GaussianBlurEffect`].
    GaussianBlur,
    /// [`LevelsEffect`].
    Levels,
    /// [`PosterizeEffect`].
    Posterize,
    /// [`BrightnessContrastEffect`].
    BrightnessContrast,
    /// [`SoftenPortraitEffect`].
    SoftenPortrait,
}

impl EffectKind {
    /// Every kind, in menu order.
    pub const ALL: [EffectKind; 7] = [
        Self::Median,
        Self::ReduceNoise,
        Self::GaussianBlur,
        Self::Levels,
        Self::Posterize,
        Self::BrightnessContrast,
        Self::SoftenPortrait,
    ];

    /// Command-line identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::ReduceNoise => "reduce-noise",
            Self::GaussianBlur => "gaussian-blur",
            Self::Levels => "levels",
            Self::Posterize => "posterize",
            Self::BrightnessContrast => "brightness-contrast",
            Self::SoftenPortrait => "soften-portrait",
        }
    }

    /// Default parameter record.
    pub fn default_parameters(self) -> Box<dyn EffectParameters> {
        match self {
            Self::Median => Box::new(MedianData::default()),
            Self::ReduceNoise => Box::new(ReduceNoiseData::default()),
            Self::GaussianBlur => Box::new(GaussianBlurData::default()),
            Self::Levels => Box::new(LevelsData::default()),
            Self::Posterize => Box::new(PosterizeData::default()),
            Self::BrightnessContrast => Box::new(BrightnessContrastData::default()),
            Self::SoftenPortrait => Box::new(SoftenPortraitData::default()),
        }
    }

    /// Effect with default parameters.
    pub fn create_default(self) -> Box<dyn Effect> {
        match self {
            Self::Median => Box::new(MedianEffect::default()),
            Self::ReduceNoise => Box::new(ReduceNoiseEffect::default()),
            Self::GaussianBlur => Box::new(GaussianBlurEffect::default()),
            Self::Levels => Box::new(LevelsEffect::default()),
            Self::Posterize => Box::new(PosterizeEffect::default()),
            Self::BrightnessContrast => Box::new(BrightnessContrastEffect::default()),
            Self::SoftenPortrait => Box::new(SoftenPortraitEffect::default()),
        }
    }

    /// Effect with defaults overridden by `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Unknown names and out-of-range values.
    pub fn create_with(self, overrides: &[(String, ParamValue)]) -> OpsResult<Box<dyn Effect>> {
        fn apply<P: EffectParameters>(mut data: P, overrides: &[(String, ParamValue)]) -> OpsResult<P> {
            for (name, value) in overrides {
                data.set(name, *value)?;
            }
            Ok(data)
        }

        Ok(match self {
            Self::Median => Box::new(MedianEffect::new(apply(MedianData::default(), overrides)?)),
            Self::ReduceNoise => Box::new(ReduceNoiseEffect::new(apply(ReduceNoiseData::default(), overrides)?)),
            Self::GaussianBlur => Box::new(GaussianBlurEffect::new(apply(GaussianBlurData::default(), overrides)?)),
            Self::Levels => Box::new(LevelsEffect::new(apply(LevelsData::default(), overrides)?)),
            Self::Posterize => Box::new(PosterizeEffect::new(apply(PosterizeData::default(), overrides)?)),
            Self::BrightnessContrast => Box::new(BrightnessContrastEffect::new(apply(
                BrightnessContrastData::default(),
                overrides,
            )?)),
            Self::SoftenPortrait => Box::new(SoftenPortraitEffect::new(apply(SoftenPortraitData::default(), overrides)?)),
        })
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EffectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.id() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|k| k.id()).collect();
                format!("unknown effect '{s}' (known: {})", known.join(", "))
            })
    }
}
