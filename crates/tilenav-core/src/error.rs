//! Startup-time contract violations.
//!
//! Steady-state grid operations never fail: out-of-bounds reads report
//! "solid", out-of-bounds writes are ignored. Only construction can go wrong.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("grid must have at least one tile, got {cols}x{rows}")]
    EmptyGrid { cols: i32, rows: i32 },

    #[error("grid of {cols}x{rows} tiles exceeds the addressable tile count")]
    TooLarge { cols: i32, rows: i32 },

    #[error("tile size must be finite and positive, got {0}")]
    InvalidTileSize(f32),
}
