//! Integration tests for rfx crates.
//!
//! The library part holds the shared fixtures, deterministic test surfaces;
//! content hashes come from `Surface::digest`. The test modules check
//! properties that span crates: region partitioning, determinism across
//! threading modes, pipeline ordering, and the palette registry.

use rfx_core::{ColorBgra, Surface};

/// Deterministic pseudo-random opaque surface (xorshift32).
pub fn noise(width: i32, height: i32, seed: u32) -> Surface {
    let mut state = seed.max(1);
    Surface::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [b, g, r, _] = state.to_le_bytes();
        ColorBgra::from_bgra(b, g, r, 255)
    })
}

/// Noise with a random alpha channel.
pub fn noise_with_alpha(width: i32, height: i32, seed: u32) -> Surface {
    let mut state = seed.max(1);
    Surface::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        ColorBgra::from_array(state.to_le_bytes())
    })
}

/// Alternating black and white pixels, white at `(0, 0)`.
pub fn checkerboard(width: i32, height: i32) -> Surface {
    Surface::from_fn(width, height, |x, y| if (x + y) % 2 == 0 { ColorBgra::WHITE } else { ColorBgra::BLACK })
}

#[cfg(test)]
mod determinism;
#[cfg(test)]
mod palette;
#[cfg(test)]
mod pipeline;
#[cfg(test)]
mod properties;
