//! 8-bit BGRA pixel type.
//!
//! # Types
//!
//! - [`ColorBgra`] - four independent 8-bit channels (blue, green, red, alpha)
//!
//! Arithmetic on channels is done in a wider integer or float domain and
//! clamped back with [`clamp_to_byte`] / [`clamp_f32_to_byte`], so every
//! channel stays in `[0, 255]` after any operator.
//!
//! # Channel Indices
//!
//! Generic per-channel code addresses channels by index in memory order:
//!
//! | index | channel |
//! |-------|---------|
//! | 0     | B       |
//! | 1     | G       |
//! | 2     | R       |
//! | 3     | A       |
//!
//! # Memory Layout
//!
//! `#[repr(C)]`, four bytes, `[B, G, R, A]`.

use std::fmt;

// ============================================================================
// Rec.601 Luma Constants
// ============================================================================

/// Rec.601 luma weight for blue in 16.16 fixed point (0.114).
pub const REC601_LUMA_B: u32 = 7471;

/// Rec.601 luma weight for green in 16.16 fixed point (0.587).
pub const REC601_LUMA_G: u32 = 38470;

/// Rec.601 luma weight for red in 16.16 fixed point (0.299).
pub const REC601_LUMA_R: u32 = 19595;

/// Number of channels in a [`ColorBgra`].
pub const CHANNELS: usize = 4;

/// Index of the alpha channel.
pub const ALPHA: usize = 3;

/// Clamps an integer to `[0, 255]`.
#[inline]
pub fn clamp_to_byte(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Clamps a float to `[0, 255]` and truncates toward zero.
///
/// NaN maps to 0.
#[inline]
pub fn clamp_f32_to_byte(v: f32) -> u8 {
    if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 }
}

/// An 8-bit per channel BGRA color.
///
/// # Example
///
/// ```
/// use rfx_core::ColorBgra;
///
/// let c = ColorBgra::from_rgba(255, 128, 0, 255);
/// assert_eq!(c.b, 0);
/// assert_eq!(c.channel(2), 255);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct ColorBgra {
    /// Blue channel
    pub b: u8,
    /// Green channel
    pub g: u8,
    /// Red channel
    pub r: u8,
    /// Alpha channel
    pub a: u8,
}

impl ColorBgra {
    /// Opaque black.
    pub const BLACK: Self = Self::from_bgra(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::from_bgra(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::from_bgra(0, 0, 0, 0);

    /// Creates a color from channels in memory order.
    #[inline]
    pub const fn from_bgra(b: u8, g: u8, r: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    /// Creates a color from channels in RGBA order.
    #[inline]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    /// Creates an opaque gray.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::from_bgra(v, v, v, 255)
    }

    /// Returns the channel at `index` (B=0, G=1, R=2, A=3).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    #[inline]
    pub const fn channel(&self, index: usize) -> u8 {
        match index {
            0 => self.b,
            1 => self.g,
            2 => self.r,
            3 => self.a,
            _ => panic!("channel index out of range"),
        }
    }

    /// Sets the channel at `index` (B=0, G=1, R=2, A=3).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    #[inline]
    pub fn set_channel(&mut self, index: usize, value: u8) {
        match index {
            0 => self.b = value,
            1 => self.g = value,
            2 => self.r = value,
            3 => self.a = value,
            _ => panic!("channel index out of range"),
        }
    }

    /// Returns the channels as `[B, G, R, A]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    /// Creates a color from `[B, G, R, A]`.
    #[inline]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::from_bgra(c[0], c[1], c[2], c[3])
    }

    /// Perceptual luma of the color channels, as a byte.
    ///
    /// Rec.601 weights in 16.16 fixed point: `(7471*B + 38470*G + 19595*R) >> 16`.
    /// Alpha is ignored.
    ///
    /// ```
    /// use rfx_core::ColorBgra;
    /// assert_eq!(ColorBgra::WHITE.intensity_byte(), 255);
    /// assert_eq!(ColorBgra::BLACK.intensity_byte(), 0);
    /// ```
    #[inline]
    pub const fn intensity_byte(&self) -> u8 {
        ((REC601_LUMA_B * self.b as u32 + REC601_LUMA_G * self.g as u32 + REC601_LUMA_R * self.r as u32)
            >> 16) as u8
    }

    /// Luma in `[0.0, 1.0]`.
    #[inline]
    pub fn intensity(&self) -> f64 {
        (0.114 * self.b as f64 + 0.587 * self.g as f64 + 0.299 * self.r as f64) / 255.0
    }

    /// Returns a copy with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::from_bgra(self.b, self.g, self.r, a)
    }

    /// Linear interpolation between two colors, all four channels.
    ///
    /// `t` is clamped to `[0, 1]`; each channel is rounded to nearest.
    #[inline]
    pub fn lerp(from: Self, to: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::from_bgra(
            mix(from.b, to.b),
            mix(from.g, to.g),
            mix(from.r, to.r),
            mix(from.a, to.a),
        )
    }

    /// Formats the color as `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Some(Self::from_rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl fmt::Debug for ColorBgra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColorBgra(b={}, g={}, r={}, a={})", self.b, self.g, self.r, self.a)
    }
}

impl fmt::Display for ColorBgra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 4]> for ColorBgra {
    fn from(c: [u8; 4]) -> Self {
        Self::from_array(c)
    }
}

impl From<ColorBgra> for [u8; 4] {
    fn from(c: ColorBgra) -> Self {
        c.to_array()
    }
}
