//! Brightness / contrast adjustment.
//!
//! Contrast `c` becomes a ratio `multiply / divide`:
//!
//! | contrast | multiply | divide    |
//! |----------|----------|-----------|
//! | `c < 0`  | `c + 100`| `100`     |
//! | `c > 0`  | `100`    | `100 - c` |
//! | `0`      | `1`      | `1`       |
//!
//! For every pixel intensity `i` a shift is precomputed and added to each
//! color channel, giving a 256×256 table indexed by `(intensity, value)`.
//! At contrast 100 (`divide == 0`) the result is a hard threshold of
//! `intensity + brightness` at 128, written as gray.

use crate::effect::{edit_with_dialog, ConfigDialog, Effect};
use crate::params::{expect_int, unknown, EffectParameters, ParamDescriptor, ParamValue};
use crate::pixel_ops::UnaryPixelOp;
use crate::render::{RenderContext, RenderStatus};
use crate::OpsResult;
use rfx_core::{clamp_to_byte, ColorBgra, Rect, Surface};
use tracing::{debug, trace};

const DESCRIPTORS: &[ParamDescriptor] = &[
    ParamDescriptor::int("brightness", "Brightness", -100, 100),
    ParamDescriptor::int("contrast", "Contrast", -100, 100),
];

/// Parameters of [`BrightnessContrastEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrightnessContrastData {
    /// Brightness shift, -100..=100.
    pub brightness: i32,
    /// Contrast, -100..=100.
    pub contrast: i32,
}

impl EffectParameters for BrightnessContrastData {
    fn record_name(&self) -> &'static str {
        "BrightnessContrastData"
    }

    fn descriptors(&self) -> &'static [ParamDescriptor] {
        DESCRIPTORS
    }

    fn get(&self, name: &str) -> Option<ParamValue> {
        match name {
            "brightness" => Some(ParamValue::Int(self.brightness)),
            "contrast" => Some(ParamValue::Int(self.contrast)),
            _ => None,
        }
    }

    fn store(&mut self, name: &str, value: ParamValue) -> OpsResult<()> {
        let record = self.record_name();
        match name {
            "brightness" => self.brightness = expect_int(record, name, value)?,
            "contrast" => self.contrast = expect_int(record, name, value)?,
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

/// Table-driven brightness/contrast operator.
#[derive(Clone)]
pub struct BrightnessContrast {
    threshold: bool,
    table: Vec<u8>,
}

impl BrightnessContrast {
    /// Builds the table. Inputs are clamped to `[-100, 100]`.
    pub fn new(brightness: i32, contrast: i32) -> Self {
        let brightness = brightness.clamp(-100, 100);
        let contrast = contrast.clamp(-100, 100);
        let (multiply, divide) = match contrast {
            c if c < 0 => (c + 100, 100),
            c if c > 0 => (100, 100 - c),
            _ => (1, 1),
        };
        trace!(brightness, contrast, multiply, divide, "BrightnessContrast::new");

        if divide == 0 {
            let table = (0..256)
                .map(|i: i32| if i + brightness < 128 { 0 } else { 255 })
                .collect();
            return Self { threshold: true, table };
        }

        let mut table = vec![0u8; 256 * 256];
        for i in 0..256i32 {
            let shift = if divide == 100 {
                (i - 127) * multiply / divide + 127 - i + brightness
            } else {
                (i - 127 + brightness) * multiply / divide + 127 - i
            };
            let row = &mut table[i as usize * 256..(i as usize + 1) * 256];
            for (col, slot) in row.iter_mut().enumerate() {
                *slot = clamp_to_byte(col as i32 + shift);
            }
        }
        Self { threshold: false, table }
    }
}

impl std::fmt::Debug for BrightnessContrast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrightnessContrast").field("threshold", &self.threshold).finish_non_exhaustive()
    }
}

impl UnaryPixelOp for BrightnessContrast {
    #[inline]
    fn apply(&self, c: ColorBgra) -> ColorBgra {
        let i = c.intensity_byte() as usize;
        if self.threshold {
            let v = self.table[i];
            return ColorBgra::from_bgra(v, v, v, c.a);
        }
        let row = &self.table[i * 256..(i + 1) * 256];
        ColorBgra::from_bgra(row[c.b as usize], row[c.g as usize], row[c.r as usize], c.a)
    }
}

/// Brightness and contrast adjustment.
#[derive(Debug, Clone)]
pub struct BrightnessContrastEffect {
    data: BrightnessContrastData,
    op: BrightnessContrast,
}

impl BrightnessContrastEffect {
    /// Compiles `data`.
    pub fn new(data: BrightnessContrastData) -> Self {
        Self {
            op: BrightnessContrast::new(data.brightness, data.contrast),
            data,
        }
    }

    /// Current parameters.
    pub fn data(&self) -> &BrightnessContrastData {
        &self.data
    }

    /// Replaces the parameters and recompiles.
    pub fn set_data(&mut self, data: BrightnessContrastData) {
        *self = Self::new(data);
    }
}

impl Default for BrightnessContrastEffect {
    fn default() -> Self {
        Self::new(BrightnessContrastData::default())
    }
}

impl Effect for BrightnessContrastEffect {
    fn name(&self) -> &'static str {
        "Brightness / Contrast"
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
        debug!(brightness = self.data.brightness, contrast = self.data.contrast, regions = rois.len(), "brightness/contrast");
        self.op.apply_to(src, dst, rois, ctx)
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
