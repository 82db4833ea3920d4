//! Rectangle type for regions of interest.
//!
//! Every render call receives a list of [`Rect`]s naming the parts of the
//! destination surface that must be (re)computed. Live preview re-renders
//! small dirty rectangles, so the type is small, `Copy`, and cheap to split.
//!
//! # Coordinate System
//!
//! All coordinates use the standard image convention:
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐ <- (left, top)
//!   │   │  Region  │
//!   │   └──────────┘ <- (right, bottom), inclusive
//!   ▼
//!   Y
//! ```
//!
//! Unlike many geometry types, `right()` and `bottom()` are **inclusive**:
//! they name the last column/row that belongs to the rectangle.
//!
//! # Usage
//!
//! ```rust
//! use rfx_core::Rect;
//!
//! let rect = Rect::from_ltrb(10, 20, 19, 29);
//! assert_eq!(rect.width, 10);
//! assert!(rect.contains(19, 29));
//! assert!(!rect.contains(20, 29));
//! ```
//!
//! # Used By
//!
//! - [`crate::surface::Surface`] - Bounds, region copies
//! - `rfx-ops` - Region lists for every render call

/// An axis-aligned integer rectangle.
///
/// Stored as origin plus size. A rectangle with zero (or negative) width
/// or height is empty.
///
/// # Example
///
/// ```rust
/// use rfx_core::Rect;
///
/// let rect = Rect::new(10, 20, 100, 50);
/// assert_eq!(rect.right(), 109);
/// assert_eq!(rect.bottom(), 69);
/// assert_eq!(rect.area(), 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: i32,
    /// Y coordinate of the top edge (inclusive)
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from origin (0, 0) with given dimensions.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Creates a rectangle from inclusive edges.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rfx_core::Rect;
    ///
    /// let rect = Rect::from_ltrb(0, 0, 0, 0);
    /// assert_eq!(rect.area(), 1);
    /// ```
    #[inline]
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left + 1, bottom - top + 1)
    }

    /// Left edge (inclusive).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (inclusive).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (inclusive): the last column inside the rectangle.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Bottom edge (inclusive): the last row inside the rectangle.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Returns the area of the rectangle in pixels (0 when empty).
    #[inline]
    pub const fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Returns `true` if the rectangle has no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns `true` if the point (px, py) is inside this rectangle.
    #[inline]
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }

    /// Returns `true` if this rectangle fully contains another.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rfx_core::Rect;
    ///
    /// let outer = Rect::new(0, 0, 100, 100);
    /// let inner = Rect::new(10, 10, 50, 50);
    /// assert!(outer.contains_rect(&inner));
    /// assert!(!inner.contains_rect(&outer));
    /// ```
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns `true` if this rectangle shares at least one pixel with another.
    #[inline]
    pub const fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Returns the intersection of this rectangle with another.
    ///
    /// Returns `None` if the rectangles don't overlap.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rfx_core::Rect;
    ///
    /// let a = Rect::new(0, 0, 100, 100);
    /// let b = Rect::new(50, 50, 100, 100);
    /// assert_eq!(a.intersect(&b), Some(Rect::new(50, 50, 50, 50)));
    /// ```
    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left <= right && top <= bottom {
            Some(Rect::from_ltrb(left, top, right, bottom))
        } else {
            None
        }
    }

    /// Returns the bounding box that contains both rectangles.
    #[inline]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_ltrb(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Returns this rectangle grown by `amount` pixels on every side.
    ///
    /// Negative amounts shrink it; the result may be empty.
    #[inline]
    pub const fn inflate(&self, amount: i32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + 2 * amount,
            self.height + 2 * amount,
        )
    }

    /// Clamps this rectangle to `[0, width) x [0, height)`.
    ///
    /// Returns `None` if there's no overlap.
    #[inline]
    pub fn clamp_to(&self, width: i32, height: i32) -> Option<Rect> {
        self.intersect(&Rect::from_size(width, height))
    }

    /// Returns an iterator over all (x, y) coordinates in this rectangle.
    ///
    /// Iterates row by row, left to right, top to bottom.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rfx_core::Rect;
    ///
    /// let rect = Rect::new(0, 0, 2, 2);
    /// let coords: Vec<_> = rect.iter_coords().collect();
    /// assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    /// ```
    #[inline]
    pub fn iter_coords(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.top()..=self.bottom()).flat_map(move |y| (self.left()..=self.right()).map(move |x| (x, y)))
    }

    /// Splits the rectangle into at most `count` horizontal bands.
    ///
    /// Bands are disjoint, cover the rectangle exactly, and differ in
    /// height by at most one row.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rfx_core::Rect;
    ///
    /// let bands = Rect::new(0, 0, 8, 10).split_rows(3);
    /// assert_eq!(bands.len(), 3);
    /// assert_eq!(bands.iter().map(|b| b.area()).sum::<u64>(), 80);
    /// ```
    pub fn split_rows(&self, count: usize) -> Vec<Rect> {
        if self.is_empty() || count == 0 {
            return Vec::new();
        }
        let count = i32::try_from(count).unwrap_or(i32::MAX).min(self.height);
        let base = self.height / count;
        let extra = self.height % count;

        let mut bands = Vec::with_capacity(count as usize);
        let mut top = self.y;
        for i in 0..count {
            let h = base + i32::from(i < extra);
            bands.push(Rect::new(self.x, top, self.width, h));
            top += h;
        }
        bands
    }

    /// Splits the rectangle into a `cols x rows` grid of disjoint tiles.
    ///
    /// Tiles are returned in row-major order. Grid dimensions larger than
    /// the rectangle are reduced so that no tile is empty.
    pub fn split_grid(&self, cols: usize, rows: usize) -> Vec<Rect> {
        let mut tiles = Vec::new();
        for band in self.split_rows(rows) {
            let transposed = Rect::new(band.y, band.x, band.height, band.width);
            for t in transposed.split_rows(cols) {
                tiles.push(Rect::new(t.y, t.x, t.height, t.width));
            }
        }
        tiles
    }

    /// Rewrites a possibly overlapping list as disjoint rectangles covering
    /// exactly the same pixels.
    ///
    /// The cover is cut into horizontal bands at every top and bottom edge;
    /// touching or overlapping runs within a band are merged, and
    /// consecutive bands with identical runs are joined again.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rfx_core::Rect;
    ///
    /// let cover = Rect::disjoint_cover(&[Rect::new(0, 0, 4, 4), Rect::new(2, 2, 4, 4)]);
    /// assert_eq!(cover.iter().map(Rect::area).sum::<u64>(), 28);
    /// ```
    pub fn disjoint_cover(rects: &[Rect]) -> Vec<Rect> {
        let rects: Vec<Rect> = rects.iter().copied().filter(|r| !r.is_empty()).collect();
        let mut edges: Vec<i32> = rects.iter().flat_map(|r| [r.top(), r.bottom() + 1]).collect();
        edges.sort_unstable();
        edges.dedup();

        let mut cover = Vec::new();
        let mut open: Vec<Rect> = Vec::new();
        for band in edges.windows(2) {
            let (top, next) = (band[0], band[1]);
            let mut runs: Vec<(i32, i32)> = rects
                .iter()
                .filter(|r| r.top() <= top && top <= r.bottom())
                .map(|r| (r.left(), r.right()))
                .collect();
            runs.sort_unstable();

            let mut merged: Vec<(i32, i32)> = Vec::with_capacity(runs.len());
            for (l, r) in runs {
                match merged.last_mut() {
                    Some(last) if l <= last.1 + 1 => last.1 = last.1.max(r),
                    _ => merged.push((l, r)),
                }
            }

            let continues = open.len() == merged.len()
                && open
                    .iter()
                    .zip(&merged)
                    .all(|(o, &(l, r))| o.left() == l && o.right() == r && o.bottom() + 1 == top);
            if continues {
                for o in &mut open {
                    o.height += next - top;
                }
            } else {
                cover.append(&mut open);
                open = merged.iter().map(|&(l, r)| Rect::from_ltrb(l, top, r, next - 1)).collect();
            }
        }
        cover.append(&mut open);
        cover
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_edges() {
        let r = Rect::from_ltrb(2, 3, 4, 7);
        assert_eq!(r.left(), 2);
        assert_eq!(r.top(), 3);
        assert_eq!(r.right(), 4);
        assert_eq!(r.bottom(), 7);
        assert_eq!(r.width, 3);
        assert_eq!(r.height, 5);
        assert_eq!(r.area(), 15);
    }

    #[test]
    fn test_empty() {
        assert!(Rect::new(0, 0, 0, 5).is_empty());
        assert!(Rect::new(0, 0, -1, 5).is_empty());
        assert_eq!(Rect::new(0, 0, -3, 5).area(), 0);
        assert!(!Rect::from_ltrb(0, 0, 0, 0).is_empty());
    }

    #[test]
    fn test_intersect_touching() {
        let a = Rect::from_ltrb(0, 0, 4, 4);
        let b = Rect::from_ltrb(4, 4, 8, 8);
        assert_eq!(a.intersect(&b), Some(Rect::from_ltrb(4, 4, 4, 4)));

        let c = Rect::from_ltrb(5, 5, 8, 8);
        assert_eq!(a.intersect(&c), None);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0, 0, 50, 50);
        let b = Rect::new(100, 100, 50, 50);
        assert_eq!(a.union(&b), Rect::new(0, 0, 150, 150));
    }

    #[test]
    fn test_inflate_and_clamp() {
        let r = Rect::from_ltrb(1, 1, 2, 2).inflate(3);
        assert_eq!(r, Rect::from_ltrb(-2, -2, 5, 5));
        assert_eq!(r.clamp_to(4, 4), Some(Rect::from_ltrb(0, 0, 3, 3)));
        assert_eq!(Rect::new(10, 10, 2, 2).clamp_to(4, 4), None);
    }

    #[test]
    fn test_split_rows_covers() {
        let r = Rect::new(3, 5, 7, 11);
        let bands = r.split_rows(4);
        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0].top(), 5);
        assert_eq!(bands[3].bottom(), r.bottom());
        for pair in bands.windows(2) {
            assert_eq!(pair[0].bottom() + 1, pair[1].top());
        }
        assert_eq!(bands.iter().map(Rect::area).sum::<u64>(), r.area());
    }

    #[test]
    fn test_split_rows_more_than_height() {
        let bands = Rect::new(0, 0, 4, 2).split_rows(10);
        assert_eq!(bands.len(), 2);
        assert!(bands.iter().all(|b| b.height == 1));
    }

    #[test]
    fn test_split_rows_huge_count() {
        let r = Rect::new(0, 0, 3, 5);
        assert_eq!(r.split_rows(usize::MAX).len(), 5);
        assert_eq!(r.split_grid(usize::MAX, 1).len(), 3);
    }

    #[test]
    fn test_disjoint_cover() {
        let rects = [
            Rect::from_ltrb(0, 0, 5, 3),
            Rect::from_ltrb(4, 2, 9, 7),
            Rect::from_ltrb(6, 0, 7, 1),
            Rect::from_ltrb(0, 6, 3, 6),
            Rect::new(3, 3, 0, 4),
        ];
        let cover = Rect::disjoint_cover(&rects);
        for (i, a) in cover.iter().enumerate() {
            for b in &cover[i + 1..] {
                assert!(!a.overlaps(b), "{a} overlaps {b}");
            }
        }
        for y in -1..=8 {
            for x in -1..=10 {
                let wanted = rects.iter().any(|r| r.contains(x, y));
                let got = cover.iter().filter(|r| r.contains(x, y)).count();
                assert_eq!(got, usize::from(wanted), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_disjoint_cover_joins_stacked_bands() {
        let cover = Rect::disjoint_cover(&[Rect::from_ltrb(0, 0, 4, 1), Rect::from_ltrb(0, 2, 4, 5)]);
        assert_eq!(cover, vec![Rect::from_ltrb(0, 0, 4, 5)]);
        assert!(Rect::disjoint_cover(&[]).is_empty());
    }

    #[test]
    fn test_split_grid_disjoint() {
        let r = Rect::new(0, 0, 10, 7);
        let tiles = r.split_grid(3, 2);
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles.iter().map(Rect::area).sum::<u64>(), r.area());
        for (i, a) in tiles.iter().enumerate() {
            assert!(r.contains_rect(a));
            for b in &tiles[i + 1..] {
                assert!(!a.overlaps(b), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn test_iter_coords_inclusive() {
        let r = Rect::from_ltrb(1, 1, 2, 1);
        let coords: Vec<_> = r.iter_coords().collect();
        assert_eq!(coords, vec![(1, 1), (2, 1)]);
    }
}
