//! Geometry primitives: tile [`Point`], half-open tile [`Range`] and
//! continuous [`WorldPos`].
//!
//! Tile coordinates grow right (x) and down (y). A `Range` is the unit of
//! every rectangular operation in the crate family: terrain painting, dirty
//! rectangles for region rebuilds and grid clearing.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A tile coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four cardinal neighbours (up, right, down, left).
    #[inline]
    pub fn neighbors_4(self) -> [Point; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
        ]
    }

    /// All eight neighbours, cardinal ones first.
    ///
    /// Cardinals come first so that searches which break ties by insertion
    /// order prefer straight steps.
    #[inline]
    pub fn neighbors_8(self) -> [Point; 8] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y - 1),
            Self::new(self.x + 1, self.y + 1),
            Self::new(self.x - 1, self.y + 1),
            Self::new(self.x - 1, self.y - 1),
        ]
    }

    /// Whether `other` is one of the eight surrounding tiles.
    #[inline]
    pub fn is_adjacent(self, other: Point) -> bool {
        let d = other - self;
        d != Point::ZERO && d.x.abs() <= 1 && d.y.abs() <= 1
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Point {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open tile rectangle \[min, max).
///
/// All empty ranges compare equal, so an intersection that misses is simply
/// `Range::default()`.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        (self.min == other.min && self.max == other.max) || (self.is_empty() && other.is_empty())
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_empty() {
            Point::ZERO.hash(state);
            Point::ZERO.hash(state);
        } else {
            self.min.hash(state);
            self.max.hash(state);
        }
    }
}

impl Range {
    /// Create a range from two corners, canonicalized so that `min` ≤ `max`.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Create a range from an origin and a size.
    ///
    /// Unlike [`Range::new`] this does not canonicalize: a zero or negative
    /// width/height yields the empty range.
    #[inline]
    pub fn from_rect(x: i32, y: i32, w: i32, h: i32) -> Self {
        if w <= 0 || h <= 0 {
            return Self::default();
        }
        Self {
            min: Point::new(x, y),
            max: Point::new(x.saturating_add(w), y.saturating_add(h)),
        }
    }

    /// The single-tile range at `p`.
    #[inline]
    pub fn tile(p: Point) -> Self {
        Self {
            min: p,
            max: Point::new(p.x.saturating_add(1), p.y.saturating_add(1)),
        }
    }

    /// Size as a `Point` (width, height).
    #[inline]
    pub fn size(self) -> Point {
        Point::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Total number of tiles in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    /// Whether the range has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Whether `p` is inside the half-open range.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Whether `p` lies on the outermost ring of the range.
    #[inline]
    pub fn on_border(self, p: Point) -> bool {
        self.contains(p)
            && (p.x == self.min.x
                || p.y == self.min.y
                || p.x == self.max.x - 1
                || p.y == self.max.y - 1)
    }

    /// Intersection of two ranges (the empty range if they do not overlap).
    #[inline]
    pub fn intersect(self, other: Range) -> Self {
        let r = Self {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Smallest range that contains both ranges.
    #[inline]
    pub fn union(self, other: Range) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow the range by `n` tiles on every side. Empty ranges stay empty.
    /// Coordinates saturate at the `i32` limits.
    #[inline]
    pub fn expand(self, n: i32) -> Self {
        if self.is_empty() {
            return self;
        }
        let r = Self {
            min: Point::new(self.min.x.saturating_sub(n), self.min.y.saturating_sub(n)),
            max: Point::new(self.max.x.saturating_add(n), self.max.y.saturating_add(n)),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Whether the two ranges overlap.
    #[inline]
    pub fn overlaps(self, other: Range) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Row-major iterator over every point in the range.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

/// Row-major iterator over the points in a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    cur: Point,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.range.is_empty() || self.cur.y >= self.range.max.y {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.range.max.x {
            self.cur.x = self.range.min.x;
            self.cur.y += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() || self.cur.y >= self.range.max.y {
            return (0, Some(0));
        }
        let w = self.range.width() as usize;
        let remaining_in_row = (self.range.max.x - self.cur.x) as usize;
        let remaining_rows = (self.range.max.y - self.cur.y - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for RangeIter {}

// ---------------------------------------------------------------------------
// WorldPos
// ---------------------------------------------------------------------------

/// A continuous position in world units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: WorldPos) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, 4);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(b - a, Point::new(2, 2));
        assert_eq!(a * 3, Point::new(3, 6));
    }

    #[test]
    fn neighbors_8_lists_cardinals_first() {
        let p = Point::new(5, 5);
        let n = p.neighbors_8();
        assert_eq!(&n[..4], &p.neighbors_4());
        assert!(n.iter().all(|&q| p.is_adjacent(q)));
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Point::new(7, 5)));
    }

    #[test]
    fn from_rect_rejects_degenerate_sizes() {
        assert!(Range::from_rect(2, 2, 0, 5).is_empty());
        assert!(Range::from_rect(2, 2, 5, -1).is_empty());
        let r = Range::from_rect(2, 3, 4, 5);
        assert_eq!(r, Range::new(2, 3, 6, 8));
        assert_eq!(r.len(), 20);
    }

    #[test]
    fn expand_saturates_at_the_limits() {
        let r = Range::new(0, 0, i32::MAX, i32::MAX).expand(1);
        assert_eq!(r, Range::new(-1, -1, i32::MAX, i32::MAX));
        let r = Range::new(i32::MIN, i32::MIN, 4, 4).expand(2);
        assert_eq!(r, Range::new(i32::MIN, i32::MIN, 6, 6));
        assert_eq!(Range::new(2, 2, 6, 6).expand(-2), Range::default());
        let t = Range::tile(Point::new(i32::MAX, 0));
        assert!(t.is_empty());
    }

    #[test]
    fn range_basics() {
        let r = Range::new(3, 2, 0, 0);
        assert_eq!(r.min, Point::new(0, 0));
        assert_eq!(r.size(), Point::new(3, 2));
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 0)));
    }

    #[test]
    fn range_intersect_and_union() {
        let a = Range::new(0, 0, 4, 4);
        let b = Range::new(2, 2, 6, 6);
        assert_eq!(a.intersect(b), Range::new(2, 2, 4, 4));
        assert_eq!(a.union(b), Range::new(0, 0, 6, 6));
        assert_eq!(a.intersect(Range::new(9, 9, 10, 10)), Range::default());
        assert_eq!(Range::default().union(b), b);
    }

    #[test]
    fn expand_grows_every_side() {
        let r = Range::tile(Point::new(3, 3)).expand(1);
        assert_eq!(r, Range::new(2, 2, 5, 5));
        assert!(Range::default().expand(3).is_empty());
    }

    #[test]
    fn border_detection() {
        let r = Range::new(0, 0, 4, 3);
        assert!(r.on_border(Point::new(0, 1)));
        assert!(r.on_border(Point::new(3, 1)));
        assert!(r.on_border(Point::new(1, 2)));
        assert!(!r.on_border(Point::new(1, 1)));
        assert!(!r.on_border(Point::new(4, 1)));
    }

    #[test]
    fn range_iter_is_row_major() {
        let r = Range::new(1, 1, 3, 3);
        let pts: Vec<_> = r.iter().collect();
        assert_eq!(
            pts,
            vec![
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(1, 2),
                Point::new(2, 2)
            ]
        );
        assert_eq!(r.iter().len(), 4);
    }

    #[test]
    fn world_distance() {
        let a = WorldPos::new(0.0, 0.0);
        let b = WorldPos::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }
}
