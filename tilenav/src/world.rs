//! The navigation facade: terrain, tile grid, regions and pathfinder kept
//! consistent with one list of structures.

use std::collections::{BTreeMap, HashMap, HashSet};

use tilenav_core::{
    EntityId, FloorType, Point, Range, TerrainGrid, TerrainType, TileGrid, WorldPos,
};
use tilenav_paths::{Movement, Path, PathRequest, Pathfinder, SearchStats};
use tilenav_regions::{DoorTile, ObjectId, Positioned, RegionManager, RegionStats};

use crate::config::NavConfig;
use crate::error::Result;
use crate::structure::{Structure, StructureKind};

/// Harvestable resources agents search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Tree,
    Rock,
    BerryBush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    Structure(StructureKind),
    Resource(ResourceKind),
}

/// A point of interest as seen by nearest-object queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldObject {
    pub entity: EntityId,
    pub kind: ObjectKind,
    pub pos: Point,
    /// Always true for resources.
    pub complete: bool,
}

impl Positioned for WorldObject {
    fn position(&self) -> Point {
        self.pos
    }
}

/// Owns every navigation layer of one map and keeps them in step.
///
/// Edits update the tile grid immediately (clear, stamp structures, sync
/// terrain) and queue a region rebuild for the touched rectangle. Queued
/// rebuilds are merged and applied before the next query.
pub struct NavWorld {
    config: NavConfig,
    grid: TileGrid,
    terrain: TerrainGrid,
    structures: BTreeMap<EntityId, Structure>,
    resources: HashMap<EntityId, (ResourceKind, Point)>,
    doors: Vec<DoorTile>,
    locked: HashSet<EntityId>,
    locked_tiles: HashSet<Point>,
    regions: RegionManager<WorldObject>,
    objects: HashMap<EntityId, ObjectId>,
    pathfinder: Pathfinder,
}

impl NavWorld {
    pub fn new(config: NavConfig) -> Result<Self> {
        let grid =
            TileGrid::with_tile_size(config.grid.cols, config.grid.rows, config.grid.tile_size)?;
        let terrain = TerrainGrid::for_grid(&grid)?;
        let pathfinder = Pathfinder::with_limits(grid.bounds(), config.search_limits());
        let regions = RegionManager::new(config.region_settings());
        log::info!(
            "navigation world {}x{} (tile size {})",
            grid.cols(),
            grid.rows(),
            grid.tile_size()
        );
        Ok(Self {
            config,
            grid,
            terrain,
            structures: BTreeMap::new(),
            resources: HashMap::new(),
            doors: Vec::new(),
            locked: HashSet::new(),
            locked_tiles: HashSet::new(),
            regions,
            objects: HashMap::new(),
            pathfinder,
        })
    }

    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// The tile grid. Always current; region data may lag until
    /// [`flush`](Self::flush).
    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    #[inline]
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    #[inline]
    pub fn regions(&self) -> &RegionManager<WorldObject> {
        &self.regions
    }

    #[inline]
    pub fn search_stats(&self) -> SearchStats {
        self.pathfinder.stats()
    }

    pub fn region_stats(&self) -> RegionStats {
        self.regions.stats()
    }

    // -----------------------------------------------------------------------
    // Terrain
    // -----------------------------------------------------------------------

    /// Paint terrain over a rectangle. Returns the tiles painted.
    pub fn paint_terrain(&mut self, x: i32, y: i32, w: i32, h: i32, kind: TerrainType) -> Range {
        let r = self.terrain.set_terrain_rect(x, y, w, h, kind);
        self.restamp(r);
        r
    }

    /// Paint floors over a rectangle. Returns the tiles painted.
    pub fn paint_floor(&mut self, x: i32, y: i32, w: i32, h: i32, kind: FloorType) -> Range {
        let r = self.terrain.set_floor_rect(x, y, w, h, kind);
        self.restamp(r);
        r
    }

    /// Bring `area` of the tile grid back in line with structures and
    /// terrain. Clearing comes first: syncing before the clear would lose
    /// every terrain cost in the area.
    fn restamp(&mut self, area: Range) {
        let area = area.intersect(self.grid.bounds());
        if area.is_empty() {
            return;
        }
        self.grid.clear_rect(area);
        for s in self.structures.values().filter(|s| s.blocks()) {
            for p in s.footprint().intersect(area) {
                self.grid.set_solid(p, true);
            }
        }
        self.terrain.sync_to_grid(&mut self.grid, Some(area));
        self.regions.request_rebuild(area);
    }

    // -----------------------------------------------------------------------
    // Structures
    // -----------------------------------------------------------------------

    /// Place a structure, replacing any structure with the same id.
    pub fn add_structure(&mut self, structure: Structure) {
        let mut dirty = structure.footprint();
        if let Some(old) = self.structures.insert(structure.id, structure) {
            dirty = dirty.union(old.footprint());
        }
        self.refresh_object(structure.id);
        self.structures_changed(dirty);
    }

    pub fn remove_structure(&mut self, id: EntityId) -> Option<Structure> {
        let old = self.structures.remove(&id)?;
        if self.locked.remove(&id) {
            self.regions.set_door_permeable(id, true);
        }
        self.refresh_object(id);
        self.structures_changed(old.footprint());
        Some(old)
    }

    /// Finish (or un-finish) construction. Returns false for unknown ids.
    pub fn set_structure_complete(&mut self, id: EntityId, complete: bool) -> bool {
        let Some(s) = self.structures.get_mut(&id) else {
            return false;
        };
        if s.complete == complete {
            return true;
        }
        s.complete = complete;
        let dirty = s.footprint();
        self.refresh_object(id);
        self.structures_changed(dirty);
        true
    }

    pub fn structure(&self, id: EntityId) -> Option<&Structure> {
        self.structures.get(&id)
    }

    pub fn structures(&self) -> impl Iterator<Item = &Structure> + '_ {
        self.structures.values()
    }

    fn structures_changed(&mut self, dirty: Range) {
        self.doors = self.structures.values().flat_map(|s| s.door_tiles()).collect();
        self.refresh_locked_tiles();
        self.restamp(dirty);
    }

    // -----------------------------------------------------------------------
    // Doors
    // -----------------------------------------------------------------------

    /// Lock or unlock a door. Locked doors stay in the region graph but no
    /// query may pass through them. Returns false if `door` is not a door.
    pub fn set_door_locked(&mut self, door: EntityId, locked: bool) -> bool {
        if !self.structures.get(&door).is_some_and(|s| s.kind.is_door()) {
            return false;
        }
        if locked {
            self.locked.insert(door);
        } else {
            self.locked.remove(&door);
        }
        self.regions.set_door_permeable(door, !locked);
        self.refresh_locked_tiles();
        true
    }

    pub fn is_door_locked(&self, door: EntityId) -> bool {
        self.locked.contains(&door)
    }

    fn refresh_locked_tiles(&mut self) {
        self.locked_tiles = self
            .doors
            .iter()
            .filter(|d| self.locked.contains(&d.id))
            .map(|d| d.pos)
            .collect();
    }

    // -----------------------------------------------------------------------
    // Points of interest
    // -----------------------------------------------------------------------

    /// Register a harvestable resource. Resources do not block movement.
    pub fn add_resource(&mut self, id: EntityId, kind: ResourceKind, pos: Point) {
        self.resources.insert(id, (kind, pos));
        self.refresh_object(id);
    }

    pub fn remove_resource(&mut self, id: EntityId) -> bool {
        let removed = self.resources.remove(&id).is_some();
        if removed {
            self.refresh_object(id);
        }
        removed
    }

    /// Re-register the object for `id` from the structure and resource
    /// tables.
    fn refresh_object(&mut self, id: EntityId) {
        if let Some(old) = self.objects.remove(&id) {
            self.regions.remove_object(old);
        }
        let object = match (self.structures.get(&id), self.resources.get(&id)) {
            (Some(s), _) if s.kind.is_point_of_interest() => Some(WorldObject {
                entity: id,
                kind: ObjectKind::Structure(s.kind),
                pos: s.pos,
                complete: s.complete,
            }),
            (None, Some(&(kind, pos))) => Some(WorldObject {
                entity: id,
                kind: ObjectKind::Resource(kind),
                pos,
                complete: true,
            }),
            _ => None,
        };
        if let Some(object) = object {
            let handle = self.regions.add_object(object);
            self.objects.insert(id, handle);
        }
    }

    // -----------------------------------------------------------------------
    // Regions
    // -----------------------------------------------------------------------

    /// Apply queued region rebuilds.
    pub fn flush(&mut self) {
        self.regions.flush(&self.grid, &self.doors);
    }

    /// Throw the region graph away and build it again.
    pub fn rebuild_regions(&mut self) {
        self.regions.rebuild_full(&self.grid, &self.doors);
    }

    /// Toggle the region system. Enabling rebuilds immediately.
    pub fn set_regions_enabled(&mut self, enabled: bool) {
        self.regions.set_enabled(enabled);
        if enabled {
            self.rebuild_regions();
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether `to` can be reached from `from`. Off-map points never are.
    pub fn is_reachable(&mut self, from: Point, to: Point) -> bool {
        if !self.grid.contains(from) || !self.grid.contains(to) {
            return false;
        }
        self.flush();
        self.regions.is_reachable(from, to)
    }

    /// Cheapest path between two tiles, or `None` when there is none.
    pub fn compute_path(&mut self, from: Point, to: Point, movement: Movement) -> Option<Path> {
        self.flush();
        let locked = &self.locked_tiles;
        let blocked = |p: Point| locked.contains(&p);
        let mut req = PathRequest::new(from, to).with_movement(movement);
        if !locked.is_empty() {
            req = req.with_blocked(&blocked);
        }
        if self.config.pathfinding.fast_reject && self.regions.is_built() {
            req = req.with_reachability(&self.regions);
        }
        self.pathfinder.compute(&self.grid, &req)
    }

    /// [`compute_path`](Self::compute_path) between world positions.
    pub fn compute_path_world(
        &mut self,
        from: WorldPos,
        to: WorldPos,
        movement: Movement,
    ) -> Option<Path> {
        let from = self.grid.world_to_tile(from)?;
        let to = self.grid.world_to_tile(to)?;
        self.compute_path(from, to, movement)
    }

    /// Closest point of interest accepted by `accept`, searched region by
    /// region outward from `from`.
    pub fn find_nearest(
        &mut self,
        from: Point,
        accept: impl FnMut(&WorldObject) -> bool,
    ) -> Option<WorldObject> {
        self.flush();
        self.regions.find_nearest(from, accept).map(|(_, o)| *o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(cols: i32, rows: i32) -> NavWorld {
        let mut config = NavConfig::default();
        config.grid.cols = cols;
        config.grid.rows = rows;
        NavWorld::new(config).unwrap()
    }

    fn wall(id: u64, x: i32, y: i32) -> Structure {
        Structure::new(EntityId(id), StructureKind::Wall, Point::new(x, y))
    }

    #[test]
    fn bad_dimensions_are_reported() {
        let mut config = NavConfig::default();
        config.grid.cols = 0;
        assert!(matches!(NavWorld::new(config), Err(crate::NavError::Grid(_))));
    }

    #[test]
    fn removing_a_wall_keeps_terrain_cost() {
        let mut w = world(8, 8);
        w.paint_terrain(0, 0, 8, 8, TerrainType::Marsh);
        w.add_structure(wall(1, 3, 3));
        assert!(w.grid().is_solid(Point::new(3, 3)));
        w.remove_structure(EntityId(1));
        assert!(!w.grid().is_solid(Point::new(3, 3)));
        assert_eq!(w.grid().cost_at(Point::new(3, 3)), Some(2.0));
    }

    #[test]
    fn impassable_terrain_survives_structure_edits() {
        let mut w = world(6, 6);
        w.paint_terrain(2, 2, 2, 2, TerrainType::DeepWater);
        let bed = Structure::new(EntityId(4), StructureKind::Bed, Point::new(2, 2)).with_size(2, 2);
        w.add_structure(bed);
        w.remove_structure(EntityId(4));
        assert!(w.grid().is_solid(Point::new(3, 3)));
        assert_eq!(w.paint_floor(2, 2, 0, 5, FloorType::StoneRoad), Range::default());
    }

    #[test]
    fn unfinished_walls_do_not_block_until_completed() {
        let mut w = world(5, 3);
        for y in 0..3 {
            w.add_structure(wall(10 + y as u64, 2, y).unfinished());
        }
        let (a, b) = (Point::new(0, 1), Point::new(4, 1));
        assert!(w.is_reachable(a, b));
        assert!(w.compute_path(a, b, Movement::GridAligned).is_some());

        for y in 0..3 {
            assert!(w.set_structure_complete(EntityId(10 + y as u64), true));
        }
        assert!(!w.set_structure_complete(EntityId(99), true));
        assert!(!w.is_reachable(a, b));
        assert!(w.compute_path(a, b, Movement::GridAligned).is_none());
    }

    #[test]
    fn locked_door_blocks_paths() {
        let mut w = world(5, 3);
        w.add_structure(wall(1, 2, 0));
        w.add_structure(wall(2, 2, 2));
        w.add_structure(Structure::new(EntityId(3), StructureKind::Door, Point::new(2, 1)));
        let (a, b) = (Point::new(0, 1), Point::new(4, 1));
        let path = w.compute_path(a, b, Movement::General).unwrap();
        assert!(path.contains(Point::new(2, 1)));

        assert!(w.set_door_locked(EntityId(3), true));
        assert!(!w.set_door_locked(EntityId(1), true));
        assert!(!w.is_reachable(a, b));
        assert!(w.compute_path(a, b, Movement::General).is_none());

        // Removing a locked door clears the lock.
        w.remove_structure(EntityId(3));
        assert!(!w.is_door_locked(EntityId(3)));
        assert!(w.is_reachable(a, b));
    }

    #[test]
    fn nearest_resource_and_workbench() {
        let mut w = world(12, 5);
        for y in 0..5 {
            w.add_structure(wall(100 + y as u64, 6, y));
        }
        w.add_resource(EntityId(1), ResourceKind::BerryBush, Point::new(8, 2));
        w.add_resource(EntityId(2), ResourceKind::BerryBush, Point::new(0, 4));
        w.add_structure(Structure::new(EntityId(3), StructureKind::Workbench, Point::new(3, 0)));

        let berry = |o: &WorldObject| o.kind == ObjectKind::Resource(ResourceKind::BerryBush);
        // The closer bush is behind the wall.
        let found = w.find_nearest(Point::new(5, 2), berry).unwrap();
        assert_eq!(found.entity, EntityId(2));

        let bench = w
            .find_nearest(Point::new(0, 0), |o| matches!(o.kind, ObjectKind::Structure(_)))
            .unwrap();
        assert_eq!(bench.entity, EntityId(3));
        assert!(w.grid().is_solid(Point::new(3, 0)));

        assert!(w.remove_resource(EntityId(2)));
        assert!(!w.remove_resource(EntityId(2)));
        assert!(w.find_nearest(Point::new(5, 2), berry).is_none());
    }

    #[test]
    fn world_coordinates() {
        let mut config = NavConfig::default();
        config.grid.cols = 10;
        config.grid.rows = 10;
        config.grid.tile_size = 2.0;
        let mut w = NavWorld::new(config).unwrap();
        let (from, to) = (WorldPos::new(0.5, 0.5), WorldPos::new(7.9, 0.1));
        let path = w.compute_path_world(from, to, Movement::GridAligned).unwrap();
        assert_eq!(path.tiles().len(), 4);
        assert_eq!(path.waypoints()[3], WorldPos::new(7.0, 1.0));
        let off_map = WorldPos::new(-1.0, 0.0);
        assert!(w.compute_path_world(off_map, to, Movement::General).is_none());
    }

    #[test]
    fn disabled_regions_fail_open_but_paths_still_work() {
        let mut w = world(5, 3);
        for y in 0..3 {
            w.add_structure(wall(1 + y as u64, 2, y));
        }
        w.set_regions_enabled(false);
        let (a, b) = (Point::new(0, 1), Point::new(4, 1));
        assert!(w.is_reachable(a, b));
        assert!(w.compute_path(a, b, Movement::General).is_none());
        assert_eq!(w.search_stats().fast_rejects, 0);
        assert_eq!(w.search_stats().searches, 1);

        w.set_regions_enabled(true);
        assert!(!w.is_reachable(a, b));
        assert!(!w.is_reachable(a, Point::new(7, 1)));
    }
}
