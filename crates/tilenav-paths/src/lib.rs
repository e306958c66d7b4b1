//! Cost-weighted A* pathfinding on tile grids.
//!
//! - [`Pathfinder::astar_path`]: generic A* over any [`AstarPather`], with
//!   deterministic tie-breaking and a hard iteration ceiling
//! - [`Pathfinder::compute`]: A* over a [`TileGrid`](tilenav_core::TileGrid)
//!   with either [`Movement`] policy and an optional [`Reachability`]
//!   pre-check that rejects hopeless queries without searching
//! - [`smooth_path`]: line-of-sight shortcutting for general paths
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | step costs |
//! | [`AstarPather`] : [`WeightedPather`] | A* |
//!
//! Repath cadence is the caller's responsibility: recompute when the goal has
//! moved far enough or enough time has passed, never unconditionally every
//! tick.

mod astar;
mod distance;
mod grid;
mod pathfinder;
mod smooth;
mod traits;

pub use distance::{euclidean, octile};
pub use grid::{GridPather, Movement, Path, PathRequest};
pub use pathfinder::{Pathfinder, SearchLimits, SearchStats};
pub use smooth::{line_of_sight, smooth_path};
pub use traits::{AstarPather, Pather, Reachability, WeightedPather};
