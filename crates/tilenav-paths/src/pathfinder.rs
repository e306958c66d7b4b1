use tilenav_core::{Point, Range};

// ---------------------------------------------------------------------------
// Internal node for the A* priority-queue search
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: f32::INFINITY,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the node array, ordered for use in `BinaryHeap`.
///
/// Lowest `f` pops first; equal `f` pops in insertion order.
#[derive(Clone, Copy)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f32,
    pub(crate) seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for NodeRef {}

// ---------------------------------------------------------------------------
// Limits and statistics
// ---------------------------------------------------------------------------

/// Budget applied to every search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// Nodes expanded before a search gives up and reports no path.
    pub max_iterations: usize,
}

impl SearchLimits {
    pub const DEFAULT_MAX_ITERATIONS: usize = 50_000;
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Running counters, useful for profiling and for checking that the
/// reachability pre-check really skips searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Full A* searches started.
    pub searches: u64,
    /// Requests answered "unreachable" by the pre-check without searching.
    pub fast_rejects: u64,
    /// Searches that hit the iteration ceiling.
    pub aborted: u64,
    /// Total nodes expanded over all searches.
    pub expanded: u64,
}

// ---------------------------------------------------------------------------
// Pathfinder
// ---------------------------------------------------------------------------

/// Reusable A* search state for one grid rectangle.
///
/// `Pathfinder` owns the node array and scratch buffers so that repeated
/// queries incur no allocations beyond the returned path. Nodes are
/// invalidated lazily by bumping a generation counter.
pub struct Pathfinder {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) nbuf: Vec<Point>,
    pub(crate) limits: SearchLimits,
    pub(crate) stats: SearchStats,
}

impl Pathfinder {
    /// Create a pathfinder for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        Self::with_limits(rng, SearchLimits::default())
    }

    pub fn with_limits(rng: Range, limits: SearchLimits) -> Self {
        let len = rng.len();
        Self {
            rng,
            width: rng.width().max(0) as usize,
            nodes: vec![Node::default(); len],
            generation: 0,
            nbuf: Vec::with_capacity(8),
            limits,
            stats: SearchStats::default(),
        }
    }

    /// Replace the underlying range, reallocating only when it grows.
    pub fn set_range(&mut self, rng: Range) {
        let new_len = rng.len();
        self.rng = rng;
        self.width = rng.width().max(0) as usize;

        if new_len <= self.nodes.len() {
            self.generation = self.generation.wrapping_add(1);
            return;
        }

        self.nodes.clear();
        self.nodes.resize(new_len, Node::default());
        self.generation = 0;
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    #[inline]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: SearchLimits) {
        self.limits = limits;
    }

    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn search_limits_round_trip() {
        let limits = SearchLimits { max_iterations: 1234 };
        let json = serde_json::to_string(&limits).unwrap();
        assert_eq!(json, r#"{"max_iterations":1234}"#);
        let back: SearchLimits = serde_json::from_str(&json).unwrap();
        assert_eq!(back, limits);
    }
}
