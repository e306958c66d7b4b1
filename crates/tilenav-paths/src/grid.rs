//! Pathfinding over a [`TileGrid`]: the two movement policies, the request
//! builder and the [`Path`] value handed back to movement code.

use std::f32::consts::SQRT_2;

use tilenav_core::{Point, TileGrid, WorldPos};

use crate::Pathfinder;
use crate::distance;
use crate::traits::{AstarPather, Pather, Reachability, WeightedPather};

/// How agents may step between tiles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Movement {
    /// 8-directional movement that may brush past a single solid corner;
    /// squeezing diagonally between two solid tiles is forbidden. Suitable
    /// when the caller smooths or interpolates the result.
    #[default]
    General,
    /// 8-directional movement that never cuts a solid corner. Waypoints are
    /// tile centres only, so a path recomputed mid-walk always agrees with
    /// the agent's current tile and never snaps it backwards.
    GridAligned,
}

/// A computed route.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    tiles: Vec<Point>,
    waypoints: Vec<WorldPos>,
    cost: f32,
    movement: Movement,
}

impl Path {
    /// Tiles from start to goal, both included.
    #[inline]
    pub fn tiles(&self) -> &[Point] {
        &self.tiles
    }

    /// Tile-centre world coordinates from start to goal.
    #[inline]
    pub fn waypoints(&self) -> &[WorldPos] {
        &self.waypoints
    }

    pub fn into_waypoints(self) -> Vec<WorldPos> {
        self.waypoints
    }

    /// Accumulated step cost.
    #[inline]
    pub fn cost(&self) -> f32 {
        self.cost
    }

    #[inline]
    pub fn movement(&self) -> Movement {
        self.movement
    }

    /// Number of waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.tiles.first().copied()
    }

    #[inline]
    pub fn goal(&self) -> Option<Point> {
        self.tiles.last().copied()
    }

    /// Whether the path visits `p`.
    pub fn contains(&self, p: Point) -> bool {
        self.tiles.contains(&p)
    }
}

/// Adapter exposing a [`TileGrid`] through the pather traits.
pub struct GridPather<'a> {
    grid: &'a TileGrid,
    movement: Movement,
    blocked: Option<&'a dyn Fn(Point) -> bool>,
    // Cheapest possible step multiplier; scales the heuristic so it stays
    // admissible on grids with sub-unit costs.
    floor: f32,
}

impl<'a> GridPather<'a> {
    pub fn new(grid: &'a TileGrid, movement: Movement) -> Self {
        Self {
            grid,
            movement,
            blocked: None,
            floor: grid.min_cost(),
        }
    }

    /// Additionally treat tiles for which `blocked` returns `true` as solid.
    pub fn with_blocked(mut self, blocked: &'a dyn Fn(Point) -> bool) -> Self {
        self.blocked = Some(blocked);
        self
    }

    #[inline]
    pub fn passable(&self, p: Point) -> bool {
        self.grid.is_passable(p) && !self.blocked.is_some_and(|b| b(p))
    }
}

impl Pather for GridPather<'_> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for n in p.neighbors_8() {
            if !self.passable(n) {
                continue;
            }
            let d = n - p;
            if d.x != 0 && d.y != 0 {
                let side_a = self.passable(p.shift(d.x, 0));
                let side_b = self.passable(p.shift(0, d.y));
                let allowed = match self.movement {
                    Movement::General => side_a || side_b,
                    Movement::GridAligned => side_a && side_b,
                };
                if !allowed {
                    continue;
                }
            }
            buf.push(n);
        }
    }
}

impl WeightedPather for GridPather<'_> {
    fn cost(&self, from: Point, to: Point) -> f32 {
        let base = if from.x != to.x && from.y != to.y {
            SQRT_2
        } else {
            1.0
        };
        base * self.grid.cost_at(to).unwrap_or(f32::INFINITY)
    }
}

impl AstarPather for GridPather<'_> {
    fn estimate(&self, from: Point, to: Point) -> f32 {
        let d = match self.movement {
            Movement::General => distance::euclidean(from, to),
            Movement::GridAligned => distance::octile(from, to),
        };
        d * self.floor
    }
}

/// Parameters of a single path query.
#[derive(Clone, Copy)]
pub struct PathRequest<'a> {
    pub from: Point,
    pub to: Point,
    pub movement: Movement,
    reach: Option<&'a dyn Reachability>,
    blocked: Option<&'a dyn Fn(Point) -> bool>,
}

impl<'a> PathRequest<'a> {
    /// A general-movement request with no pre-check.
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            movement: Movement::General,
            reach: None,
            blocked: None,
        }
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    /// Shorthand for `with_movement(Movement::GridAligned)`.
    pub fn grid_aligned(self) -> Self {
        self.with_movement(Movement::GridAligned)
    }

    /// Reject up front when `reach` says the goal cannot be reached.
    pub fn with_reachability(mut self, reach: &'a dyn Reachability) -> Self {
        self.reach = Some(reach);
        self
    }

    /// Treat extra tiles as solid for this query (e.g. locked doors).
    pub fn with_blocked(mut self, blocked: &'a dyn Fn(Point) -> bool) -> Self {
        self.blocked = Some(blocked);
        self
    }
}

impl Pathfinder {
    /// Run a path query against `grid`.
    ///
    /// Returns `None` (never panics) when either endpoint is outside the
    /// grid or solid, when the reachability pre-check rules the goal out,
    /// when the search exhausts, or when it hits the iteration ceiling.
    pub fn compute(&mut self, grid: &TileGrid, req: &PathRequest<'_>) -> Option<Path> {
        if self.rng != grid.bounds() {
            self.set_range(grid.bounds());
        }

        let mut pather = GridPather::new(grid, req.movement);
        if let Some(blocked) = req.blocked {
            pather = pather.with_blocked(blocked);
        }
        if !pather.passable(req.from) || !pather.passable(req.to) {
            return None;
        }

        if req.from != req.to {
            if let Some(reach) = req.reach {
                if !reach.is_reachable(req.from, req.to) {
                    self.stats.fast_rejects += 1;
                    log::trace!("fast reject {} -> {}", req.from, req.to);
                    return None;
                }
            }
        }

        let (tiles, cost) = self.astar_path(&pather, req.from, req.to)?;
        let waypoints = tiles.iter().map(|&p| grid.tile_center(p)).collect();
        Some(Path {
            tiles,
            waypoints,
            cost,
            movement: req.movement,
        })
    }

    /// General-movement path between two tiles, without pre-check.
    pub fn compute_path(&mut self, grid: &TileGrid, from: Point, to: Point) -> Option<Path> {
        self.compute(grid, &PathRequest::new(from, to))
    }

    /// Grid-aligned path between two tiles, without pre-check.
    pub fn compute_grid_path(&mut self, grid: &TileGrid, from: Point, to: Point) -> Option<Path> {
        self.compute(grid, &PathRequest::new(from, to).grid_aligned())
    }
}
