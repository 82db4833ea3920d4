//! Two-input pixel operators and blend modes.
//!
//! A [`BinaryPixelOp`] combines a *bottom* (underlying) color with a *top*
//! color. Argument order matters: most modes are not commutative.
//!
//! # Blend Modes
//!
//! - [`BlendMode::Normal`] - top replaces bottom
//! - [`BlendMode::Multiply`] - darken by multiplication
//! - [`BlendMode::Screen`] - lighten (inverse multiply)
//! - [`BlendMode::Overlay`] - multiply or screen depending on the bottom channel
//!
//! # Compositing
//!
//! [`BlendOp`] applies a mode to B, G, R and then composites with alpha:
//! where only the bottom is visible the bottom color shows, where only the
//! top is visible the top color shows, and where both overlap the blended
//! color shows. All arithmetic is integer with round-to-nearest division
//! by 255.
//!
//! # Example
//!
//! ```rust
//! use rfx_core::ColorBgra;
//! use rfx_ops::blend::{BinaryPixelOp, BlendOp};
//!
//! let mid = ColorBgra::gray(128);
//! assert_eq!(BlendOp::overlay().apply(mid, mid), mid);
//! ```

use rfx_core::ColorBgra;
use std::fmt;
use std::str::FromStr;

/// A pure function of (bottom, top) to one pixel.
pub trait BinaryPixelOp: Send + Sync {
    /// Combines `bottom` with `top`.
    fn apply(&self, bottom: ColorBgra, top: ColorBgra) -> ColorBgra;

    /// Combines two rows element-wise into `dst`.
    fn apply_rows(&self, bottom: &[ColorBgra], top: &[ColorBgra], dst: &mut [ColorBgra]) {
        for ((d, b), t) in dst.iter_mut().zip(bottom).zip(top) {
            *d = self.apply(*b, *t);
        }
    }
}

impl<T: BinaryPixelOp + ?Sized> BinaryPixelOp for Box<T> {
    #[inline]
    fn apply(&self, bottom: ColorBgra, top: ColorBgra) -> ColorBgra {
        (**self).apply(bottom, top)
    }
}

/// Blend mode applied to the color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BlendMode {
    /// Top replaces bottom.
    #[default]
    Normal,
    /// Multiply (darken).
    Multiply,
    /// Screen (lighten).
    Screen,
    /// Overlay (contrast).
    Overlay,
}

impl BlendMode {
    /// All modes, in declaration order.
    pub const ALL: [BlendMode; 4] = [Self::Normal, Self::Multiply, Self::Screen, Self::Overlay];

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
        }
    }

    /// Blends one color channel.
    #[inline]
    pub fn blend_channel(self, bottom: u8, top: u8) -> u8 {
        match self {
            Self::Normal => top,
            Self::Multiply => mul_un8(bottom as u32, top as u32) as u8,
            Self::Screen => 255 - mul_un8(255 - bottom as u32, 255 - top as u32) as u8,
            Self::Overlay => overlay_channel(bottom, top),
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown blend mode '{s}'"))
    }
}

/// `a * b / 255`, rounded to nearest.
#[inline]
fn mul_un8(a: u32, b: u32) -> u32 {
    (a * b + 127) / 255
}

/// Overlay of one channel.
///
/// ```text
/// bottom <  128 -> 2 * top * bottom / 255
/// bottom >= 128 -> 255 - 2 * (255 - top) * (255 - bottom) / 255
/// ```
///
/// Divisions round to nearest, which makes 128 over 128 exactly 128.
#[inline]
pub fn overlay_channel(bottom: u8, top: u8) -> u8 {
    let (b, t) = (bottom as u32, top as u32);
    if b < 128 {
        ((2 * t * b + 127) / 255) as u8
    } else {
        (255 - (2 * (255 - t) * (255 - b) + 127) / 255) as u8
    }
}

/// A [`BlendMode`] with alpha compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlendOp {
    mode: BlendMode,
}

impl BlendOp {
    /// Creates a blend operator for `mode`.
    pub const fn new(mode: BlendMode) -> Self {
        Self { mode }
    }

    /// Overlay blend.
    pub const fn overlay() -> Self {
        Self::new(BlendMode::Overlay)
    }

    /// The mode this operator applies.
    pub fn mode(&self) -> BlendMode {
        self.mode
    }
}

impl BinaryPixelOp for BlendOp {
    fn apply(&self, bottom: ColorBgra, top: ColorBgra) -> ColorBgra {
        let ab = bottom.a as u32;
        let at = top.a as u32;

        // Coverage split: bottom only, both, top only.
        let bottom_only = mul_un8(ab, 255 - at);
        let both = mul_un8(ab, at);
        let top_only = at - both;
        let total = bottom_only + at;
        if total == 0 {
            return ColorBgra::TRANSPARENT;
        }

        let mix = |b: u8, t: u8| -> u8 {
            let f = self.mode.blend_channel(b, t) as u32;
            ((b as u32 * bottom_only + t as u32 * top_only + f * both + total / 2) / total) as u8
        };
        ColorBgra::from_bgra(
            mix(bottom.b, top.b),
            mix(bottom.g, top.g),
            mix(bottom.r, top.r),
            total as u8,
        )
    }
}
