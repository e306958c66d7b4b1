use tilenav_core::Point;

/// Minimal pathfinding interface: neighbor enumeration.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather with weighted edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be finite and > 0.
    fn cost(&self, from: Point, to: Point) -> f32;
}

/// Full A* pather with an admissible heuristic.
pub trait AstarPather: WeightedPather {
    /// Estimate of the cost from `from` to `to`.
    /// Must never overestimate the true cost.
    fn estimate(&self, from: Point, to: Point) -> f32;
}

/// Coarse connectivity oracle consulted before a full search.
///
/// Implementations may answer `true` when unsure; they must only answer
/// `false` when no path can exist.
pub trait Reachability {
    fn is_reachable(&self, from: Point, to: Point) -> bool;
}

impl<F: Fn(Point, Point) -> bool> Reachability for F {
    fn is_reachable(&self, from: Point, to: Point) -> bool {
        self(from, to)
    }
}
