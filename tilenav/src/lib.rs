//! Tile-based navigation.
//!
//! [`NavWorld`] ties the layers together: a terrain layer derives movement
//! costs, structures stamp solid tiles, a region graph answers reachability
//! and nearest-object queries, and an A* pathfinder uses both.
//!
//! ```no_run
//! use tilenav::{Movement, NavConfig, NavWorld, Point, Structure, StructureKind, EntityId};
//!
//! let mut world = NavWorld::new(NavConfig::default())?;
//! world.add_structure(Structure::new(EntityId(1), StructureKind::Wall, Point::new(5, 0)).with_size(1, 10));
//! let path = world.compute_path(Point::new(0, 0), Point::new(9, 0), Movement::GridAligned);
//! # Ok::<(), tilenav::NavError>(())
//! ```

pub mod config;
pub mod debug;
pub mod demo;
pub mod error;
pub mod repath;
pub mod structure;
pub mod world;

#[cfg(test)]
mod scenarios;

pub use config::NavConfig;
pub use error::{NavError, Result};
pub use repath::{RepathPolicy, RepathState};
pub use structure::{Structure, StructureKind};
pub use world::{NavWorld, ObjectKind, ResourceKind, WorldObject};

pub use tilenav_core::{EntityId, FloorType, Point, Range, TerrainType, WorldPos};
pub use tilenav_paths::{Movement, Path, SearchStats, smooth_path};
pub use tilenav_regions::{RegionId, RegionStats, RoomId};
