//! Region graph for tile maps.
//!
//! Passable tiles are partitioned into regions: maximal 4-connected areas
//! that never contain a door, with each door tile a region of its own.
//! Adjacent regions are linked, and regions joined without passing a door
//! form rooms. The graph answers "can A reach B at all?" in a handful of
//! region hops, which lets a pathfinder skip hopeless A* searches, and it
//! caches objects per region so "closest berry bush" only looks at nearby
//! regions.
//!
//! [`RegionManager`] owns the graph, repairs it incrementally when the map
//! changes and fails open (answers "reachable") whenever no graph exists.

mod builder;
mod manager;
mod region;
mod stats;

pub use builder::{DoorTile, RebuildReport, RegionBuilder, RegionSettings};
pub use manager::{Positioned, RegionManager};
pub use region::{Link, ObjectId, Region, RegionGraph, RegionId, Room, RoomId};
pub use stats::{RegionStats, render_regions};
