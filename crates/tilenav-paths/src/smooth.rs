//! Line-of-sight shortcutting for general-movement paths.
//!
//! Only meaningful for [`Movement::General`]: grid-aligned paths must keep
//! every tile centre, so they are returned untouched.

use tilenav_core::{Point, TileGrid, WorldPos};

use crate::grid::{Movement, Path};

/// Whether a straight segment between the centres of `a` and `b` only
/// crosses passable tiles.
///
/// Where the segment passes exactly through a tile corner both tiles
/// beside the corner must be passable.
pub fn line_of_sight(grid: &TileGrid, a: Point, b: Point) -> bool {
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    let sx = (b.x - a.x).signum();
    let sy = (b.y - a.y).signum();

    let mut p = a;
    if grid.is_solid(p) {
        return false;
    }
    let (mut ix, mut iy) = (0, 0);
    while ix < dx || iy < dy {
        let decision = (1 + 2 * ix) * dy - (1 + 2 * iy) * dx;
        if decision == 0 {
            if grid.is_solid(p.shift(sx, 0)) || grid.is_solid(p.shift(0, sy)) {
                return false;
            }
            p = p.shift(sx, sy);
            ix += 1;
            iy += 1;
        } else if decision < 0 {
            p = p.shift(sx, 0);
            ix += 1;
        } else {
            p = p.shift(0, sy);
            iy += 1;
        }
        if grid.is_solid(p) {
            return false;
        }
    }
    true
}

/// Drop intermediate waypoints that have line of sight past them.
///
/// The first and last waypoints are always kept.
pub fn smooth_path(grid: &TileGrid, path: &Path) -> Vec<WorldPos> {
    let tiles = path.tiles();
    if path.movement() == Movement::GridAligned || tiles.len() <= 2 {
        return path.waypoints().to_vec();
    }

    let mut smoothed = vec![grid.tile_center(tiles[0])];
    let mut i = 0;
    while i < tiles.len() - 1 {
        let mut furthest = i + 1;
        for j in (i + 2)..tiles.len() {
            if line_of_sight(grid, tiles[i], tiles[j]) {
                furthest = j;
            }
        }
        smoothed.push(grid.tile_center(tiles[furthest]));
        i = furthest;
    }
    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pathfinder;

    #[test]
    fn open_ground_smooths_to_endpoints() {
        let grid = TileGrid::new(10, 10).unwrap();
        let mut pf = Pathfinder::new(grid.bounds());
        let path = pf
            .compute_path(&grid, Point::new(0, 0), Point::new(9, 4))
            .unwrap();
        let smoothed = smooth_path(&grid, &path);
        assert_eq!(smoothed.len(), 2);
        assert_eq!(smoothed[0], grid.tile_center(Point::new(0, 0)));
        assert_eq!(smoothed[1], grid.tile_center(Point::new(9, 4)));
    }

    #[test]
    fn walls_block_sight() {
        let mut grid = TileGrid::new(5, 5).unwrap();
        grid.set_solid(Point::new(2, 2), true);
        assert!(!line_of_sight(&grid, Point::new(0, 2), Point::new(4, 2)));
        assert!(!line_of_sight(&grid, Point::new(1, 1), Point::new(3, 3)));
        assert!(line_of_sight(&grid, Point::new(0, 0), Point::new(4, 0)));
    }

    #[test]
    fn corner_crossing_needs_both_sides() {
        let mut grid = TileGrid::new(3, 3).unwrap();
        grid.set_solid(Point::new(1, 0), true);
        assert!(!line_of_sight(&grid, Point::new(0, 0), Point::new(1, 1)));
        assert!(line_of_sight(&grid, Point::new(0, 1), Point::new(1, 2)));
    }

    #[test]
    fn grid_aligned_paths_are_untouched() {
        let grid = TileGrid::new(6, 6).unwrap();
        let mut pf = Pathfinder::new(grid.bounds());
        let path = pf
            .compute_grid_path(&grid, Point::new(0, 0), Point::new(5, 2))
            .unwrap();
        assert_eq!(smooth_path(&grid, &path), path.waypoints().to_vec());
    }
}
