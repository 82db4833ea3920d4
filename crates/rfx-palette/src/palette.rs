//! Ordered color palette with change callbacks.
//!
//! Listeners register a callback with [`Palette::subscribe`] and receive the
//! full color list after every mutation. There is no event queue; callbacks
//! run synchronously on the mutating thread.

use crate::error::{PaletteError, PaletteResult};
use rfx_core::ColorBgra;
use std::fmt;
use tracing::trace;

/// Callback invoked with the new color list.
pub type PaletteListener = Box<dyn Fn(&[ColorBgra]) + Send + Sync>;

/// Handle returned by [`Palette::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// RGB triples of the built-in palette: white, black, four grays, then
/// fourteen saturated/pastel hue pairs.
const DEFAULT_RGB: [(u8, u8, u8); 34] = [
    (255, 255, 255),
    (0, 0, 0),
    (160, 160, 160),
    (128, 128, 128),
    (64, 64, 64),
    (48, 48, 48),
    (255, 0, 0),
    (255, 127, 127),
    (255, 106, 0),
    (255, 178, 127),
    (255, 216, 0),
    (255, 233, 127),
    (182, 255, 0),
    (218, 255, 127),
    (76, 255, 0),
    (165, 255, 127),
    (0, 255, 33),
    (127, 255, 142),
    (0, 255, 144),
    (127, 255, 197),
    (0, 255, 255),
    (127, 255, 255),
    (0, 148, 255),
    (127, 201, 255),
    (0, 38, 255),
    (127, 146, 255),
    (72, 0, 255),
    (161, 127, 255),
    (178, 0, 255),
    (214, 127, 255),
    (255, 0, 220),
    (255, 127, 237),
    (255, 0, 110),
    (255, 127, 182),
];

/// Number of colors in the default palette.
pub const DEFAULT_PALETTE_LEN: usize = DEFAULT_RGB.len();

/// The default palette colors, opaque.
pub fn default_colors() -> Vec<ColorBgra> {
    DEFAULT_RGB
        .iter()
        .map(|&(r, g, b)| ColorBgra::from_rgba(r, g, b, 255))
        .collect()
}

/// Ordered list of colors plus its listeners.
pub struct Palette {
    colors: Vec<ColorBgra>,
    listeners: Vec<(SubscriptionId, PaletteListener)>,
    next_id: u64,
}

impl Palette {
    /// Palette holding `colors`.
    pub fn from_colors(colors: Vec<ColorBgra>) -> Self {
        Self {
            colors,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// `true` if the palette holds no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`.
    pub fn get(&self, index: usize) -> Option<ColorBgra> {
        self.colors.get(index).copied()
    }

    /// All colors in order.
    pub fn colors(&self) -> &[ColorBgra] {
        &self.colors
    }

    /// Replaces the color at `index`.
    ///
    /// # Errors
    ///
    /// [`PaletteError::IndexOutOfRange`] past the end.
    pub fn set(&mut self, index: usize, color: ColorBgra) -> PaletteResult<()> {
        let len = self.colors.len();
        let slot = self
            .colors
            .get_mut(index)
            .ok_or(PaletteError::IndexOutOfRange { index, len })?;
        *slot = color;
        self.notify();
        Ok(())
    }

    /// Truncates or pads with white to `len` colors.
    pub fn resize(&mut self, len: usize) {
        self.colors.resize(len, ColorBgra::WHITE);
        self.colors.shrink_to_fit();
        self.notify();
    }

    /// Restores the default colors.
    pub fn load_default(&mut self) {
        self.colors = default_colors();
        self.notify();
    }

    /// Replaces every color.
    pub fn replace(&mut self, colors: Vec<ColorBgra>) {
        self.colors = colors;
        self.colors.shrink_to_fit();
        self.notify();
    }

    /// Registers a change callback.
    pub fn subscribe(&mut self, listener: impl Fn(&[ColorBgra]) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a callback. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        trace!(colors = self.colors.len(), listeners = self.listeners.len(), "palette changed");
        for (_, listener) in &self.listeners {
            listener(&self.colors);
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_colors(default_colors())
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette")
            .field("colors", &self.colors.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(palette: &mut Palette) -> (Arc<AtomicUsize>, SubscriptionId) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let id = palette.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (hits, id)
    }

    #[test]
    fn test_default_palette() {
        let p = Palette::default();
        assert_eq!(p.len(), DEFAULT_PALETTE_LEN);
        assert_eq!(p.get(0), Some(ColorBgra::WHITE));
        assert_eq!(p.get(1), Some(ColorBgra::BLACK));
        assert_eq!(p.get(6), Some(ColorBgra::from_rgba(255, 0, 0, 255)));
        assert_eq!(p.get(DEFAULT_PALETTE_LEN), None);
    }

    #[test]
    fn test_every_mutation_notifies() {
        let mut p = Palette::default();
        let (hits, _) = counting(&mut p);

        p.set(3, ColorBgra::BLACK).unwrap();
        p.resize(40);
        p.resize(40);
        p.load_default();
        p.replace(vec![ColorBgra::BLACK]);
        assert_eq!(hits.load(Ordering::SeqCst), 5);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_resize_pads_with_white() {
        let mut p = Palette::from_colors(vec![ColorBgra::BLACK]);
        p.resize(3);
        assert_eq!(p.colors(), &[ColorBgra::BLACK, ColorBgra::WHITE, ColorBgra::WHITE]);
        p.resize(0);
        assert!(p.is_empty());
    }

    #[test]
    fn test_set_out_of_range() {
        let mut p = Palette::from_colors(vec![ColorBgra::BLACK]);
        let (hits, _) = counting(&mut p);
        assert!(matches!(
            p.set(5, ColorBgra::WHITE),
            Err(PaletteError::IndexOutOfRange { index: 5, len: 1 })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut p = Palette::default();
        let (hits, id) = counting(&mut p);
        assert!(p.unsubscribe(id));
        assert!(!p.unsubscribe(id));
        p.load_default();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
