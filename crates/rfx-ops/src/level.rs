//! Input/output level remapping with per-channel gamma.
//!
//! For each color channel `i` with input range `[lo_i, hi_i]`, output range
//! `[out_lo_i, out_hi_i]` and gamma `g_i`:
//!
//! ```text
//! v <  lo_i             -> out_lo_i
//! v >= hi_i             -> out_hi_i
//! otherwise             -> out_lo_i + (out_hi_i - out_lo_i) * ((v - lo_i) / (hi_i - lo_i))^g_i
//! ```
//!
//! The result is clamped to `[0, 255]` and truncated. Since the output only
//! depends on the input byte, the mapping is compiled into three 256-entry
//! curves when the operator is built. Alpha passes through.

use crate::pixel_ops::UnaryPixelOp;
use rfx_core::{clamp_f32_to_byte, ColorBgra};
use tracing::trace;

/// Smallest accepted gamma.
pub const GAMMA_MIN: f32 = 0.1;
/// Largest accepted gamma.
pub const GAMMA_MAX: f32 = 10.0;

/// Compiled levels operator.
#[derive(Clone)]
pub struct Level {
    in_low: ColorBgra,
    in_high: ColorBgra,
    out_low: ColorBgra,
    out_high: ColorBgra,
    gamma: [f32; 3],
    curves: [[u8; 256]; 3],
}

impl Level {
    /// Builds the operator. `gamma` is `[blue, green, red]`, each clamped
    /// to [`GAMMA_MIN`]..=[`GAMMA_MAX`].
    pub fn new(
        in_low: ColorBgra,
        in_high: ColorBgra,
        gamma: [f32; 3],
        out_low: ColorBgra,
        out_high: ColorBgra,
    ) -> Self {
        let gamma = gamma.map(|g| if g.is_nan() { 1.0 } else { g.clamp(GAMMA_MIN, GAMMA_MAX) });
        let mut level = Self {
            in_low,
            in_high,
            out_low,
            out_high,
            gamma,
            curves: [[0; 256]; 3],
        };
        level.rebuild_curves();
        trace!(%in_low, %in_high, %out_low, %out_high, ?gamma, "Level::new");
        level
    }

    /// The identity mapping: full ranges, gamma 1.
    pub fn identity() -> Self {
        Self::new(ColorBgra::BLACK, ColorBgra::WHITE, [1.0; 3], ColorBgra::BLACK, ColorBgra::WHITE)
    }

    /// Input low point.
    pub fn in_low(&self) -> ColorBgra {
        self.in_low
    }

    /// Input high point.
    pub fn in_high(&self) -> ColorBgra {
        self.in_high
    }

    /// Output low point.
    pub fn out_low(&self) -> ColorBgra {
        self.out_low
    }

    /// Output high point.
    pub fn out_high(&self) -> ColorBgra {
        self.out_high
    }

    /// Gamma as `[blue, green, red]`.
    pub fn gamma(&self) -> [f32; 3] {
        self.gamma
    }

    /// `true` when every input range is non-degenerate (`lo < hi`).
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self.in_low.channel(i) < self.in_high.channel(i))
    }

    /// Evaluates the unquantized curve for channel `index` (B=0, G=1, R=2).
    pub fn apply_channel(&self, index: usize, v: f32) -> u8 {
        let lo = self.in_low.channel(index) as f32;
        let hi = self.in_high.channel(index) as f32;
        let out_lo = self.out_low.channel(index) as f64;
        let out_hi = self.out_high.channel(index) as f64;

        let d = v - lo;
        if d < 0.0 {
            self.out_low.channel(index)
        } else if v >= hi {
            self.out_high.channel(index)
        } else {
            let t = ((d / (hi - lo)) as f64).powf(self.gamma[index] as f64);
            clamp_f32_to_byte((out_lo + (out_hi - out_lo) * t) as f32)
        }
    }

    /// Looks up the compiled curve for channel `index`.
    #[inline]
    pub fn curve(&self, index: usize) -> &[u8; 256] {
        &self.curves[index]
    }

    fn rebuild_curves(&mut self) {
        for index in 0..3 {
            for v in 0..256 {
                self.curves[index][v] = self.apply_channel(index, v as f32);
            }
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("in_low", &self.in_low)
            .field("in_high", &self.in_high)
            .field("out_low", &self.out_low)
            .field("out_high", &self.out_high)
            .field("gamma", &self.gamma)
            .finish()
    }
}

impl UnaryPixelOp for Level {
    #[inline]
    fn apply(&self, c: ColorBgra) -> ColorBgra {
        ColorBgra::from_bgra(
            self.curves[0][c.b as usize],
            self.curves[1][c.g as usize],
            self.curves[2][c.r as usize],
            c.a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gamma_curve_tracks_power_law() {
        let level = Level::new(ColorBgra::BLACK, ColorBgra::WHITE, [2.0, 0.5, 1.0], ColorBgra::BLACK, ColorBgra::WHITE);
        for v in 1..255u8 {
            let t = v as f64 / 255.0;
            // Truncation keeps every entry at most one step below the exact curve.
            assert_abs_diff_eq!(level.curve(0)[v as usize] as f64, 255.0 * t.powf(2.0), epsilon = 1.0);
            assert_abs_diff_eq!(level.curve(1)[v as usize] as f64, 255.0 * t.powf(0.5), epsilon = 1.0);
            assert!(level.curve(0)[v as usize] as f64 <= 255.0 * t.powf(2.0) + 1e-3);
        }
    }

    #[test]
    fn test_identity() {
        let level = Level::identity();
        for v in 0..=255u8 {
            let c = ColorBgra::from_bgra(v, 255 - v, v / 2, v);
            assert_eq!(level.apply(c), c);
        }
    }

    #[test]
    fn test_clipping_below_and_above() {
        let level = Level::new(ColorBgra::gray(50), ColorBgra::gray(200), [1.0; 3], ColorBgra::BLACK, ColorBgra::WHITE);
        assert_eq!(level.apply(ColorBgra::gray(10)), ColorBgra::BLACK);
        assert_eq!(level.apply(ColorBgra::gray(49)), ColorBgra::BLACK);
        assert_eq!(level.apply(ColorBgra::gray(200)), ColorBgra::WHITE);
        assert_eq!(level.apply(ColorBgra::gray(250)), ColorBgra::WHITE);
        // (125 - 50) / 150 * 255 = 127.5, truncated
        assert_eq!(level.apply(ColorBgra::gray(125)).g, 127);
    }

    #[test]
    fn test_output_range_and_alpha() {
        let level = Level::new(ColorBgra::BLACK, ColorBgra::WHITE, [1.0; 3], ColorBgra::gray(100), ColorBgra::gray(150));
        let out = level.apply(ColorBgra::from_bgra(0, 255, 0, 42));
        assert_eq!(out, ColorBgra::from_bgra(100, 150, 100, 42));
    }

    #[test]
    fn test_gamma_per_channel() {
        let level = Level::new(ColorBgra::BLACK, ColorBgra::WHITE, [2.0, 1.0, 0.5], ColorBgra::BLACK, ColorBgra::WHITE);
        let out = level.apply(ColorBgra::gray(128));
        assert!(out.b < 128, "gamma > 1 darkens");
        assert_eq!(out.g, 128);
        assert!(out.r > 128, "gamma < 1 brightens");
    }

    #[test]
    fn test_gamma_clamped() {
        let level = Level::new(ColorBgra::BLACK, ColorBgra::WHITE, [0.0, 100.0, f32::NAN], ColorBgra::BLACK, ColorBgra::WHITE);
        assert_eq!(level.gamma(), [GAMMA_MIN, GAMMA_MAX, 1.0]);
    }

    #[test]
    fn test_degenerate_range_is_step() {
        let level = Level::new(ColorBgra::gray(100), ColorBgra::gray(100), [1.0; 3], ColorBgra::BLACK, ColorBgra::WHITE);
        assert!(!level.is_valid());
        assert_eq!(level.apply(ColorBgra::gray(99)).r, 0);
        assert_eq!(level.apply(ColorBgra::gray(100)).r, 255);
    }
}
