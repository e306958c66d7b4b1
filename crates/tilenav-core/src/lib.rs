//! **tilenav-core**: shared types for tile-based navigation.
//!
//! - [`Point`], [`Range`] and [`WorldPos`] geometry
//! - [`TileGrid`]: dense per-tile solidity and movement cost
//! - [`TerrainGrid`]: terrain and floor layers that derive movement cost and
//!   are synced into a `TileGrid`
//!
//! Everything here is synchronous and single-owner; consumers read the grid
//! between simulation steps.

pub mod error;
pub mod geom;
pub mod terrain;
pub mod tile_grid;

pub use error::GridError;
pub use geom::{Point, Range, RangeIter, WorldPos};
pub use terrain::{FloorType, TerrainGrid, TerrainType, movement_cost, sync_terrain_to_grid};
pub use tile_grid::{DEFAULT_COST, MIN_PASSABLE_COST, TileGrid};

/// Opaque handle for an external entity (a door, a building, a resource).
///
/// The navigation layers never interpret it; they only carry it back to the
/// caller, e.g. on door-backed region links.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
