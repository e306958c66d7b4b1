//! Terrain and floor layers and the movement-cost model derived from them.
//!
//! Each tile carries a [`TerrainType`] (natural ground) and a [`FloorType`]
//! (anything laid on top). The movement cost of a tile is the product of the
//! two layer costs; either layer can make a tile impassable.
//!
//! The layers are authoritative; [`TileGrid`] only holds a copy. After any
//! paint operation, and after any clear of the tile grid, the affected area
//! must be re-synced with [`sync_terrain_to_grid`]. Syncing before a clear
//! loses the terrain costs: the clear resets them to the default.

use crate::error::GridError;
use crate::geom::{Point, Range};
use crate::tile_grid::TileGrid;

/// Natural ground type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainType {
    #[default]
    Soil,
    Grass,
    Sand,
    Gravel,
    Mud,
    Marsh,
    ShallowWater,
    DeepWater,
    Rock,
}

impl TerrainType {
    pub const ALL: [TerrainType; 9] = [
        TerrainType::Soil,
        TerrainType::Grass,
        TerrainType::Sand,
        TerrainType::Gravel,
        TerrainType::Mud,
        TerrainType::Marsh,
        TerrainType::ShallowWater,
        TerrainType::DeepWater,
        TerrainType::Rock,
    ];

    /// Step multiplier, or `None` when the terrain cannot be walked on.
    pub const fn cost(self) -> Option<f32> {
        match self {
            TerrainType::Soil | TerrainType::Grass => Some(1.0),
            TerrainType::Gravel => Some(1.2),
            TerrainType::Sand => Some(1.4),
            TerrainType::Marsh => Some(2.0),
            TerrainType::Mud => Some(2.5),
            TerrainType::ShallowWater => Some(3.0),
            TerrainType::DeepWater | TerrainType::Rock => None,
        }
    }

    #[inline]
    pub const fn is_passable(self) -> bool {
        self.cost().is_some()
    }
}

/// Floor laid over the terrain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloorType {
    #[default]
    None,
    StoneRoad,
    WoodPlank,
    Carpet,
    Rubble,
    Pit,
}

impl FloorType {
    pub const ALL: [FloorType; 6] = [
        FloorType::None,
        FloorType::StoneRoad,
        FloorType::WoodPlank,
        FloorType::Carpet,
        FloorType::Rubble,
        FloorType::Pit,
    ];

    /// Step multiplier, or `None` when the floor cannot be walked on.
    pub const fn cost(self) -> Option<f32> {
        match self {
            FloorType::None => Some(1.0),
            FloorType::StoneRoad => Some(0.5),
            FloorType::WoodPlank => Some(0.8),
            FloorType::Carpet => Some(0.9),
            FloorType::Rubble => Some(1.5),
            FloorType::Pit => None,
        }
    }

    #[inline]
    pub const fn is_passable(self) -> bool {
        self.cost().is_some()
    }
}

/// Combined step multiplier of a terrain/floor pair, `None` if impassable.
#[inline]
pub fn movement_cost(terrain: TerrainType, floor: FloorType) -> Option<f32> {
    Some(terrain.cost()? * floor.cost()?)
}

/// Per-tile terrain and floor layers, same dimensions as the [`TileGrid`]
/// they feed.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    cols: i32,
    rows: i32,
    terrain: Vec<TerrainType>,
    floors: Vec<FloorType>,
}

impl TerrainGrid {
    /// Create a grid of [`TerrainType::Soil`] with no floors.
    pub fn new(cols: i32, rows: i32) -> Result<Self, GridError> {
        if cols <= 0 || rows <= 0 {
            return Err(GridError::EmptyGrid { cols, rows });
        }
        let len = (cols as u64) * (rows as u64);
        if len > u32::MAX as u64 {
            return Err(GridError::TooLarge { cols, rows });
        }
        let len = len as usize;
        Ok(Self {
            cols,
            rows,
            terrain: vec![TerrainType::default(); len],
            floors: vec![FloorType::default(); len],
        })
    }

    /// A terrain grid matching `grid`'s dimensions.
    pub fn for_grid(grid: &TileGrid) -> Result<Self, GridError> {
        Self::new(grid.cols(), grid.rows())
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.cols, self.rows)
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.cols || p.y >= self.rows {
            return None;
        }
        Some(p.y as usize * self.cols as usize + p.x as usize)
    }

    pub fn terrain_at(&self, p: Point) -> Option<TerrainType> {
        self.idx(p).map(|i| self.terrain[i])
    }

    pub fn floor_at(&self, p: Point) -> Option<FloorType> {
        self.idx(p).map(|i| self.floors[i])
    }

    /// Paint `kind` over the `w × h` rectangle at (`x`, `y`).
    ///
    /// The rectangle is clipped to the grid; zero-area or inverted rectangles
    /// do nothing. Returns the tiles actually painted (possibly empty), which
    /// is the area to re-sync.
    pub fn set_terrain_rect(&mut self, x: i32, y: i32, w: i32, h: i32, kind: TerrainType) -> Range {
        let r = Range::from_rect(x, y, w, h).intersect(self.bounds());
        for p in r {
            let i = p.y as usize * self.cols as usize + p.x as usize;
            self.terrain[i] = kind;
        }
        r
    }

    /// Paint floor `kind` over the `w × h` rectangle at (`x`, `y`).
    ///
    /// Same clipping rules as [`set_terrain_rect`](Self::set_terrain_rect).
    pub fn set_floor_rect(&mut self, x: i32, y: i32, w: i32, h: i32, kind: FloorType) -> Range {
        let r = Range::from_rect(x, y, w, h).intersect(self.bounds());
        for p in r {
            let i = p.y as usize * self.cols as usize + p.x as usize;
            self.floors[i] = kind;
        }
        r
    }

    /// Movement cost at (`x`, `y`): terrain cost × floor cost.
    ///
    /// `None` when either layer is impassable or the tile is outside the grid.
    pub fn calculate_movement_cost(&self, x: i32, y: i32) -> Option<f32> {
        let i = self.idx(Point::new(x, y))?;
        movement_cost(self.terrain[i], self.floors[i])
    }

    /// Copy derived costs into `grid`, globally or restricted to `dirty`.
    ///
    /// Passable tiles receive their cost; impassable tiles are marked solid.
    /// Solidity set by anything else (structures) is never cleared here, so
    /// the owner clears the area first, stamps structures, then syncs.
    pub fn sync_to_grid(&self, grid: &mut TileGrid, dirty: Option<Range>) {
        let area = dirty
            .unwrap_or_else(|| self.bounds())
            .intersect(self.bounds())
            .intersect(grid.bounds());
        let mut blocked = 0usize;
        for p in area {
            match self.calculate_movement_cost(p.x, p.y) {
                Some(cost) => grid.set_cost(p, cost),
                None => {
                    grid.set_solid(p, true);
                    blocked += 1;
                }
            }
        }
        log::trace!(
            "terrain sync over {} ({} tiles, {} impassable)",
            area,
            area.len(),
            blocked
        );
    }
}

/// Free-function form of [`TerrainGrid::sync_to_grid`].
#[inline]
pub fn sync_terrain_to_grid(terrain: &TerrainGrid, grid: &mut TileGrid, dirty: Option<Range>) {
    terrain.sync_to_grid(grid, dirty);
}
