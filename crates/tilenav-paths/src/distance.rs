use tilenav_core::Point;

/// Octile distance: the length of the shortest 8-directional walk with unit
/// cardinal steps and √2 diagonal steps.
#[inline]
pub fn octile(a: Point, b: Point) -> f32 {
    let dx = (a.x - b.x).abs() as f32;
    let dy = (a.y - b.y).abs() as f32;
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    hi + (std::f32::consts::SQRT_2 - 1.0) * lo
}

/// Euclidean (L2) distance between two tiles.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    dx.hypot(dy)
}
