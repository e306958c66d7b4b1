//! Dense per-tile solidity and movement-cost arrays.
//!
//! [`TileGrid`] is the single structure every navigation layer reads: the
//! pathfinder expands over it, the region builder flood-fills it and the
//! terrain layer writes derived costs into it.
//!
//! Costs written through [`TileGrid::set_cost`] are clamped to
//! [`MIN_PASSABLE_COST`], so every passable tile always carries a finite,
//! positive step multiplier.

use crate::error::GridError;
use crate::geom::{Point, Range, WorldPos};

/// Cost of a tile nothing has written to.
pub const DEFAULT_COST: f32 = 1.0;

/// Lower bound for any passable tile's movement cost.
pub const MIN_PASSABLE_COST: f32 = 0.1;

/// A `cols × rows` grid of solidity flags and movement costs, row-major.
#[derive(Debug, Clone)]
pub struct TileGrid {
    cols: i32,
    rows: i32,
    tile_size: f32,
    solid: Vec<bool>,
    cost: Vec<f32>,
    // Lower bound on every cost written since the last full clear. It only
    // ever decreases between clears, which keeps it a valid bound for the
    // A* heuristic.
    cost_floor: f32,
}

impl TileGrid {
    /// Create a grid with unit tile size, every tile passable at [`DEFAULT_COST`].
    pub fn new(cols: i32, rows: i32) -> Result<Self, GridError> {
        Self::with_tile_size(cols, rows, 1.0)
    }

    /// Create a grid whose tiles are `tile_size` world units wide.
    pub fn with_tile_size(cols: i32, rows: i32, tile_size: f32) -> Result<Self, GridError> {
        if cols <= 0 || rows <= 0 {
            return Err(GridError::EmptyGrid { cols, rows });
        }
        let len = (cols as u64) * (rows as u64);
        if len > u32::MAX as u64 {
            return Err(GridError::TooLarge { cols, rows });
        }
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        let len = len as usize;
        Ok(Self {
            cols,
            rows,
            tile_size,
            solid: vec![false; len],
            cost: vec![DEFAULT_COST; len],
            cost_floor: DEFAULT_COST,
        })
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// World units per tile.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Number of tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.solid.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty()
    }

    /// The full extent of the grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.cols, self.rows)
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.cols && p.y < self.rows
    }

    /// Row-major index of `p`, or `None` outside the grid.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.y as usize * self.cols as usize + p.x as usize)
    }

    /// Point of a row-major index.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let cols = self.cols as usize;
        Point::new((idx % cols) as i32, (idx / cols) as i32)
    }

    /// Whether `p` is solid. Tiles outside the grid count as solid.
    #[inline]
    pub fn is_solid(&self, p: Point) -> bool {
        match self.idx(p) {
            Some(i) => self.solid[i],
            None => true,
        }
    }

    /// Whether an agent may stand on `p`.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        !self.is_solid(p)
    }

    /// Movement cost of `p`, or `None` when it is outside the grid or solid.
    #[inline]
    pub fn cost_at(&self, p: Point) -> Option<f32> {
        let i = self.idx(p)?;
        if self.solid[i] { None } else { Some(self.cost[i]) }
    }

    /// Set the solidity of `p`. Ignored outside the grid.
    #[inline]
    pub fn set_solid(&mut self, p: Point, solid: bool) {
        if let Some(i) = self.idx(p) {
            self.solid[i] = solid;
        }
    }

    /// Set the movement cost of `p`. Ignored outside the grid.
    ///
    /// Non-finite values fall back to [`DEFAULT_COST`]; finite values are
    /// clamped to at least [`MIN_PASSABLE_COST`].
    #[inline]
    pub fn set_cost(&mut self, p: Point, cost: f32) {
        let Some(i) = self.idx(p) else {
            return;
        };
        let cost = if cost.is_finite() {
            cost.max(MIN_PASSABLE_COST)
        } else {
            DEFAULT_COST
        };
        self.cost[i] = cost;
        self.cost_floor = self.cost_floor.min(cost);
    }

    /// Reset every tile to passable at [`DEFAULT_COST`].
    ///
    /// Terrain-derived costs are gone after this; callers must re-sync the
    /// terrain layer afterwards.
    pub fn clear(&mut self) {
        self.solid.fill(false);
        self.cost.fill(DEFAULT_COST);
        self.cost_floor = DEFAULT_COST;
    }

    /// Reset the tiles of `r` (clipped to the grid) to passable at
    /// [`DEFAULT_COST`].
    pub fn clear_rect(&mut self, r: Range) {
        let r = r.intersect(self.bounds());
        let cols = self.cols as usize;
        for y in r.min.y..r.max.y {
            let row = y as usize * cols;
            let (x0, x1) = (row + r.min.x as usize, row + r.max.x as usize);
            self.solid[x0..x1].fill(false);
            self.cost[x0..x1].fill(DEFAULT_COST);
        }
        self.cost_floor = self.cost_floor.min(DEFAULT_COST);
    }

    /// A lower bound on the cost of every passable tile.
    #[inline]
    pub fn min_cost(&self) -> f32 {
        self.cost_floor
    }

    /// Raw solidity array, row-major.
    #[inline]
    pub fn solid(&self) -> &[bool] {
        &self.solid
    }

    /// Raw cost array, row-major.
    #[inline]
    pub fn costs(&self) -> &[f32] {
        &self.cost
    }

    /// World position of the centre of tile `p`.
    #[inline]
    pub fn tile_center(&self, p: Point) -> WorldPos {
        WorldPos::new(
            (p.x as f32 + 0.5) * self.tile_size,
            (p.y as f32 + 0.5) * self.tile_size,
        )
    }

    /// Tile containing `pos`, or `None` when `pos` lies outside the grid.
    pub fn world_to_tile(&self, pos: WorldPos) -> Option<Point> {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return None;
        }
        let p = Point::new(
            (pos.x / self.tile_size).floor() as i32,
            (pos.y / self.tile_size).floor() as i32,
        );
        self.contains(p).then_some(p)
    }

    /// Tile containing `pos`, clamped onto the grid edge when outside.
    pub fn clamp_to_grid(&self, pos: WorldPos) -> Point {
        let fx = if pos.x.is_finite() { pos.x } else { 0.0 };
        let fy = if pos.y.is_finite() { pos.y } else { 0.0 };
        Point::new(
            ((fx / self.tile_size).floor() as i32).clamp(0, self.cols - 1),
            ((fy / self.tile_size).floor() as i32).clamp(0, self.rows - 1),
        )
    }
}
