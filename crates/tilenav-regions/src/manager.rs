use std::collections::{HashMap, HashSet, VecDeque};

use tilenav_core::{EntityId, Point, Range, TileGrid};
use tilenav_paths::{Reachability, euclidean};

use crate::builder::{DoorTile, RebuildReport, RegionBuilder, RegionSettings};
use crate::region::{ObjectId, Region, RegionGraph, RegionId, Room, RoomId};
use crate::stats::RegionStats;

/// Anything the manager can file under a tile.
pub trait Positioned {
    fn position(&self) -> Point;
}

impl Positioned for Point {
    fn position(&self) -> Point {
        *self
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    pos: Point,
    homes: Vec<RegionId>,
}

/// Owns the region graph for one map and answers reachability and
/// nearest-object queries from it.
///
/// Until the first build, and whenever the system is disabled, queries
/// fail open: [`is_reachable`](Self::is_reachable) answers `true` and
/// [`find_nearest`](Self::find_nearest) scans every object.
#[derive(Debug, Clone)]
pub struct RegionManager<T> {
    settings: RegionSettings,
    builder: RegionBuilder,
    graph: Option<RegionGraph>,
    objects: Vec<Option<Slot<T>>>,
    free_objects: Vec<u32>,
    by_tile: HashMap<Point, Vec<ObjectId>>,
    locked: HashSet<EntityId>,
    pending: Option<Range>,
    full_rebuilds: u64,
    incremental_rebuilds: u64,
}

impl<T: Positioned> Default for RegionManager<T> {
    fn default() -> Self {
        Self::new(RegionSettings::default())
    }
}

impl<T: Positioned> RegionManager<T> {
    pub fn new(settings: RegionSettings) -> Self {
        Self {
            builder: RegionBuilder::new(&settings),
            settings,
            graph: None,
            objects: Vec::new(),
            free_objects: Vec::new(),
            by_tile: HashMap::new(),
            locked: HashSet::new(),
            pending: None,
            full_rebuilds: 0,
            incremental_rebuilds: 0,
        }
    }

    #[inline]
    pub fn settings(&self) -> RegionSettings {
        self.settings
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Turn the region system on or off. Disabling drops the graph, so
    /// re-enabling needs a full rebuild before queries use regions again.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.settings.enabled == enabled {
            return;
        }
        self.settings.enabled = enabled;
        if !enabled {
            self.drop_graph();
        }
        log::info!("region system {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Whether a graph is available for queries.
    #[inline]
    pub fn is_built(&self) -> bool {
        self.graph.is_some()
    }

    #[inline]
    pub fn graph(&self) -> Option<&RegionGraph> {
        self.graph.as_ref()
    }

    // -----------------------------------------------------------------------
    // Rebuilds
    // -----------------------------------------------------------------------

    /// Rebuild every region from scratch.
    pub fn rebuild_full(&mut self, grid: &TileGrid, doors: &[DoorTile]) {
        self.pending = None;
        if !self.settings.enabled {
            return;
        }
        let graph = self.builder.build_full(grid, doors, &self.locked);
        self.graph = Some(graph);
        self.full_rebuilds += 1;
        self.rehome_all();
    }

    /// React to placed, removed or completed structures.
    ///
    /// `dirty` is the changed tile rectangle; `None` forces a full rebuild,
    /// as does a missing graph or a grid whose size changed. Pending
    /// requests are folded into this rebuild.
    pub fn on_buildings_changed(
        &mut self,
        grid: &TileGrid,
        doors: &[DoorTile],
        dirty: Option<Range>,
    ) {
        if !self.settings.enabled {
            self.pending = None;
            return;
        }
        let pending = self.pending.take();
        let incremental = match (&self.graph, dirty) {
            (Some(g), Some(r)) if g.bounds() == grid.bounds() => {
                Some(pending.map_or(r, |p| p.union(r)))
            }
            _ => None,
        };
        let Some(rect) = incremental else {
            self.rebuild_full(grid, doors);
            return;
        };
        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        let report = self.builder.rebuild_area(graph, grid, doors, &self.locked, rect);
        self.incremental_rebuilds += 1;
        self.rehome_after(&report);
    }

    /// Queue a changed rectangle. Queued rectangles are merged and applied
    /// by the next [`flush`](Self::flush) or rebuild.
    pub fn request_rebuild(&mut self, dirty: Range) {
        if dirty.is_empty() {
            return;
        }
        self.pending = Some(self.pending.map_or(dirty, |p| p.union(dirty)));
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply queued rebuild requests, if any. Returns whether work was done.
    pub fn flush(&mut self, grid: &TileGrid, doors: &[DoorTile]) -> bool {
        match self.pending.take() {
            Some(rect) => {
                self.on_buildings_changed(grid, doors, Some(rect));
                true
            }
            None => false,
        }
    }

    fn drop_graph(&mut self) {
        self.graph = None;
        self.pending = None;
        for slot in self.objects.iter_mut().flatten() {
            slot.homes.clear();
        }
    }

    // -----------------------------------------------------------------------
    // Doors
    // -----------------------------------------------------------------------

    /// Lock (`false`) or unlock (`true`) a door. Locked doors keep their
    /// region but every link through them stops being traversable.
    pub fn set_door_permeable(&mut self, door: EntityId, permeable: bool) {
        let changed = if permeable {
            self.locked.remove(&door)
        } else {
            self.locked.insert(door)
        };
        if !changed {
            return;
        }
        log::debug!("door {} {}", door, if permeable { "unlocked" } else { "locked" });
        if let Some(graph) = self.graph.as_mut() {
            graph.refresh_permeability(&self.locked);
        }
    }

    #[inline]
    pub fn is_door_permeable(&self, door: EntityId) -> bool {
        !self.locked.contains(&door)
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    /// Register an object and cache it in the regions around its tile.
    pub fn add_object(&mut self, value: T) -> ObjectId {
        let pos = value.position();
        let slot = Slot {
            value,
            pos,
            homes: Vec::new(),
        };
        let id = match self.free_objects.pop() {
            Some(i) => {
                self.objects[i as usize] = Some(slot);
                ObjectId(i)
            }
            None => {
                self.objects.push(Some(slot));
                ObjectId(self.objects.len() as u32 - 1)
            }
        };
        self.by_tile.entry(pos).or_default().push(id);
        self.rehome(id);
        id
    }

    /// Unregister an object, returning it.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<T> {
        let slot = self.objects.get_mut(id.0 as usize)?.take()?;
        self.free_objects.push(id.0);
        self.unfile_tile(id, slot.pos);
        if let Some(graph) = self.graph.as_mut() {
            for &h in &slot.homes {
                if let Some(r) = graph.region_mut(h) {
                    r.objects.retain(|&o| o != id);
                }
            }
        }
        Some(slot.value)
    }

    /// Mutate an object in place; its caches follow if it moved.
    pub fn modify_object(&mut self, id: ObjectId, f: impl FnOnce(&mut T)) -> bool {
        let Some(slot) = self.objects.get_mut(id.0 as usize).and_then(Option::as_mut) else {
            return false;
        };
        f(&mut slot.value);
        let old = slot.pos;
        let new = slot.value.position();
        if old != new {
            slot.pos = new;
            self.unfile_tile(id, old);
            self.by_tile.entry(new).or_default().push(id);
            self.rehome(id);
        }
        true
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> Option<&T> {
        self.objects.get(id.0 as usize)?.as_ref().map(|s| &s.value)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &T)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (ObjectId(i as u32), &s.value)))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len() - self.free_objects.len()
    }

    /// Objects standing on `p`.
    pub fn objects_at(&self, p: Point) -> &[ObjectId] {
        self.by_tile.get(&p).map_or(&[], Vec::as_slice)
    }

    /// Regions an object at `p` belongs to: its own region, or every
    /// region orthogonally next to it when it sits on a solid tile.
    fn homes_for(graph: &RegionGraph, p: Point) -> Vec<RegionId> {
        if let Some(r) = graph.region_at(p) {
            return vec![r];
        }
        if !graph.bounds().contains(p) {
            return Vec::new();
        }
        let mut homes: Vec<RegionId> = p
            .neighbors_4()
            .into_iter()
            .filter_map(|n| graph.region_at(n))
            .collect();
        homes.sort_unstable();
        homes.dedup();
        homes
    }

    fn unfile_tile(&mut self, id: ObjectId, p: Point) {
        if let Some(list) = self.by_tile.get_mut(&p) {
            list.retain(|&o| o != id);
            if list.is_empty() {
                self.by_tile.remove(&p);
            }
        }
    }

    /// Recompute the home regions of one object and patch region caches.
    fn rehome(&mut self, id: ObjectId) {
        let Some(graph) = self.graph.as_mut() else {
            return;
        };
        let Some(slot) = self.objects.get_mut(id.0 as usize).and_then(Option::as_mut) else {
            return;
        };
        let homes = Self::homes_for(graph, slot.pos);
        for &old in &slot.homes {
            if !homes.contains(&old) {
                if let Some(r) = graph.region_mut(old) {
                    r.objects.retain(|&o| o != id);
                }
            }
        }
        for &new in &homes {
            if !slot.homes.contains(&new) {
                if let Some(r) = graph.region_mut(new) {
                    r.objects.push(id);
                }
            }
        }
        slot.homes = homes;
    }

    fn rehome_all(&mut self) {
        for slot in self.objects.iter_mut().flatten() {
            slot.homes.clear();
        }
        for i in 0..self.objects.len() {
            if self.objects[i].is_some() {
                self.rehome(ObjectId(i as u32));
            }
        }
    }

    /// Patch object caches after an incremental rebuild. Only objects that
    /// lost a home, or sit in or next to a new region, are looked at.
    fn rehome_after(&mut self, report: &RebuildReport) {
        let Some(graph) = self.graph.as_ref() else {
            return;
        };
        let removed: HashSet<RegionId> = report.removed.iter().copied().collect();
        let mut touched: Vec<ObjectId> = Vec::with_capacity(report.displaced.len());

        for &id in &report.displaced {
            if let Some(slot) = self.objects.get_mut(id.0 as usize).and_then(Option::as_mut) {
                slot.homes.retain(|h| !removed.contains(h));
                touched.push(id);
            }
        }

        if !self.by_tile.is_empty() {
            for &id in &report.created {
                let Some(region) = graph.region(id) else {
                    continue;
                };
                for &c in &region.cells {
                    let p = graph.point(c);
                    for q in std::iter::once(p).chain(p.neighbors_4()) {
                        if let Some(list) = self.by_tile.get(&q) {
                            touched.extend_from_slice(list);
                        }
                    }
                }
            }
        }

        touched.sort_unstable();
        touched.dedup();
        for id in touched {
            self.rehome(id);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Graph to answer queries with, or `None` when failing open.
    #[inline]
    fn active(&self) -> Option<&RegionGraph> {
        if !self.settings.enabled {
            return None;
        }
        self.graph.as_ref()
    }

    /// Whether `to` can be reached from `from` through permeable links.
    ///
    /// Solid or out-of-bounds endpoints are unreachable once a graph exists;
    /// without one the answer is `true`.
    pub fn is_reachable(&self, from: Point, to: Point) -> bool {
        let Some(graph) = self.active() else {
            return true;
        };
        let (Some(a), Some(b)) = (graph.region_at(from), graph.region_at(to)) else {
            return false;
        };
        if a == b {
            return true;
        }

        let mut seen = vec![false; graph.regions.len()];
        let mut queue = VecDeque::from([a]);
        seen[a.0 as usize] = true;
        while let Some(cur) = queue.pop_front() {
            let Some(region) = graph.region(cur) else {
                continue;
            };
            for link in region.links.iter().filter(|l| l.permeable) {
                if link.to == b {
                    return true;
                }
                let s = &mut seen[link.to.0 as usize];
                if !*s {
                    *s = true;
                    queue.push_back(link.to);
                }
            }
        }
        log::trace!("{} unreachable from {}", to, from);
        false
    }

    /// Find the closest object accepted by `accept`, searching region by
    /// region outward from `from`.
    ///
    /// Regions are visited in breadth-first layers over permeable links;
    /// within the first layer holding a match the straight-line closest
    /// object wins, ties going to the lower [`ObjectId`].
    pub fn find_nearest(
        &self,
        from: Point,
        mut accept: impl FnMut(&T) -> bool,
    ) -> Option<(ObjectId, &T)> {
        let Some(graph) = self.active() else {
            return self.scan_nearest(from, accept);
        };

        let mut layer = Self::homes_for(graph, from);
        let mut seen = vec![false; graph.regions.len()];
        for r in &layer {
            seen[r.0 as usize] = true;
        }
        let mut next = Vec::new();
        let mut checked: HashSet<ObjectId> = HashSet::new();

        while !layer.is_empty() {
            let mut best: Option<(f32, ObjectId)> = None;
            for &r in &layer {
                let Some(region) = graph.region(r) else {
                    continue;
                };
                for &oid in &region.objects {
                    if !checked.insert(oid) {
                        continue;
                    }
                    let Some(slot) = self.objects.get(oid.0 as usize).and_then(Option::as_ref)
                    else {
                        continue;
                    };
                    if !accept(&slot.value) {
                        continue;
                    }
                    let d = euclidean(from, slot.pos);
                    if best.is_none_or(|(bd, bid)| d.total_cmp(&bd).then(oid.cmp(&bid)).is_lt()) {
                        best = Some((d, oid));
                    }
                }
            }
            if let Some((_, oid)) = best {
                return self.object(oid).map(|v| (oid, v));
            }

            next.clear();
            for &r in &layer {
                let Some(region) = graph.region(r) else {
                    continue;
                };
                for link in region.links.iter().filter(|l| l.permeable) {
                    let s = &mut seen[link.to.0 as usize];
                    if !*s {
                        *s = true;
                        next.push(link.to);
                    }
                }
            }
            std::mem::swap(&mut layer, &mut next);
        }
        None
    }

    fn scan_nearest(
        &self,
        from: Point,
        mut accept: impl FnMut(&T) -> bool,
    ) -> Option<(ObjectId, &T)> {
        let mut best: Option<(f32, ObjectId, &T)> = None;
        for (i, slot) in self.objects.iter().enumerate() {
            let Some(slot) = slot else {
                continue;
            };
            if !accept(&slot.value) {
                continue;
            }
            let d = euclidean(from, slot.pos);
            if best.is_none_or(|(bd, _, _)| d < bd) {
                best = Some((d, ObjectId(i as u32), &slot.value));
            }
        }
        best.map(|(_, id, v)| (id, v))
    }

    // -----------------------------------------------------------------------
    // Graph accessors
    // -----------------------------------------------------------------------

    pub fn region_at(&self, p: Point) -> Option<RegionId> {
        self.graph.as_ref()?.region_at(p)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.graph.as_ref()?.region(id)
    }

    pub fn room_at(&self, p: Point) -> Option<RoomId> {
        self.graph.as_ref()?.room_at(p)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.graph.as_ref()?.room(id)
    }

    /// Counters for debugging overlays and logs.
    pub fn stats(&self) -> RegionStats {
        let mut stats = self.graph.as_ref().map(RegionStats::of).unwrap_or_default();
        stats.objects = self.object_count();
        stats.full_rebuilds = self.full_rebuilds;
        stats.incremental_rebuilds = self.incremental_rebuilds;
        stats
    }
}

impl<T: Positioned> Reachability for RegionManager<T> {
    fn is_reachable(&self, from: Point, to: Point) -> bool {
        RegionManager::is_reachable(self, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tilenav_paths::{PathRequest, Pathfinder};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        pos: Point,
        food: bool,
    }

    impl Positioned for Item {
        fn position(&self) -> Point {
            self.pos
        }
    }

    fn item(x: i32, y: i32, food: bool) -> Item {
        Item {
            pos: Point::new(x, y),
            food,
        }
    }

    const DOOR: EntityId = EntityId(1);

    /// 10x10 map, wall ring (2,2)-(7,7), door at (4,2).
    fn walled_room() -> (TileGrid, Vec<DoorTile>) {
        let mut grid = TileGrid::new(10, 10).unwrap();
        let ring = Range::new(2, 2, 8, 8);
        for p in ring {
            if ring.on_border(p) {
                grid.set_solid(p, true);
            }
        }
        let door = Point::new(4, 2);
        grid.set_solid(door, false);
        (grid, vec![DoorTile::new(DOOR, door)])
    }

    fn built() -> (TileGrid, Vec<DoorTile>, RegionManager<Item>) {
        let (grid, doors) = walled_room();
        let mut mgr = RegionManager::default();
        mgr.rebuild_full(&grid, &doors);
        (grid, doors, mgr)
    }

    #[test]
    fn fails_open_before_build_and_when_disabled() {
        let (grid, doors) = walled_room();
        let mut mgr: RegionManager<Item> = RegionManager::default();
        assert!(mgr.is_reachable(Point::new(0, 0), Point::new(2, 2)));

        mgr.rebuild_full(&grid, &doors);
        assert!(!mgr.is_reachable(Point::new(0, 0), Point::new(2, 2)));

        mgr.set_enabled(false);
        assert!(!mgr.is_built());
        assert!(mgr.is_reachable(Point::new(0, 0), Point::new(2, 2)));
        mgr.rebuild_full(&grid, &doors);
        assert!(!mgr.is_built());

        mgr.set_enabled(true);
        mgr.rebuild_full(&grid, &doors);
        assert!(mgr.is_built());
    }

    #[test]
    fn endpoints_off_the_map_or_solid() {
        let (_, _, mgr) = built();
        assert!(!mgr.is_reachable(Point::new(-1, 0), Point::new(0, 0)));
        assert!(!mgr.is_reachable(Point::new(0, 0), Point::new(10, 3)));
        assert!(!mgr.is_reachable(Point::new(0, 0), Point::new(2, 5)));
        assert!(mgr.is_reachable(Point::new(1, 1), Point::new(1, 1)));
    }

    #[test]
    fn locked_door_blocks_reachability() {
        let (_, _, mut mgr) = built();
        let inside = Point::new(5, 5);
        let outside = Point::new(0, 9);
        assert!(mgr.is_reachable(inside, outside));

        mgr.set_door_permeable(DOOR, false);
        assert!(!mgr.is_door_permeable(DOOR));
        assert!(!mgr.is_reachable(inside, outside));
        assert!(!mgr.is_reachable(outside, inside));

        mgr.set_door_permeable(DOOR, true);
        assert!(mgr.is_reachable(inside, outside));
    }

    #[test]
    fn nearest_prefers_own_region_over_straight_line() {
        let (_, _, mut mgr) = built();
        // Just behind the wall, but only reachable around through the door.
        let behind = mgr.add_object(item(1, 4, true));
        let inner = mgr.add_object(item(6, 6, true));
        let agent = Point::new(3, 4);
        assert_eq!(mgr.find_nearest(agent, |_| true).map(|(id, _)| id), Some(inner));

        mgr.remove_object(inner);
        assert_eq!(mgr.find_nearest(agent, |_| true).map(|(id, _)| id), Some(behind));

        mgr.set_door_permeable(DOOR, false);
        assert!(mgr.find_nearest(agent, |_| true).is_none());
    }

    #[test]
    fn nearest_respects_predicate_and_ties() {
        let (_, _, mut mgr) = built();
        let a = mgr.add_object(item(0, 1, true));
        let b = mgr.add_object(item(1, 0, true));
        let rock = mgr.add_object(item(0, 0, false));
        let origin = Point::new(0, 0);
        assert_eq!(mgr.find_nearest(origin, |_| true).map(|(id, _)| id), Some(rock));
        let (id, found) = mgr.find_nearest(origin, |i| i.food).unwrap();
        assert_eq!(id, a.min(b));
        assert!(found.food);
        assert!(mgr.find_nearest(origin, |i| i.pos.x > 50).is_none());
    }

    #[test]
    fn objects_on_walls_belong_to_both_sides() {
        let (_, _, mut mgr) = built();
        let bench = mgr.add_object(item(2, 4, true));
        let inside = mgr.region_at(Point::new(4, 4)).unwrap();
        let outside = mgr.region_at(Point::new(0, 0)).unwrap();
        assert!(mgr.region(inside).unwrap().objects().contains(&bench));
        assert!(mgr.region(outside).unwrap().objects().contains(&bench));
        assert_eq!(mgr.find_nearest(Point::new(5, 5), |_| true).map(|(id, _)| id), Some(bench));
        assert_eq!(mgr.find_nearest(Point::new(0, 9), |_| true).map(|(id, _)| id), Some(bench));
    }

    #[test]
    fn objects_follow_incremental_rebuilds() {
        let (mut grid, doors, mut mgr) = built();
        let berry = mgr.add_object(item(5, 5, true));

        // Wall over the berry bush: it becomes a wall-side object.
        grid.set_solid(Point::new(5, 5), true);
        mgr.on_buildings_changed(&grid, &doors, Some(Range::tile(Point::new(5, 5))));
        assert_eq!(mgr.stats().incremental_rebuilds, 1);
        let inside = mgr.region_at(Point::new(4, 4)).unwrap();
        assert!(mgr.region(inside).unwrap().objects().contains(&berry));
        assert_eq!(mgr.find_nearest(Point::new(3, 3), |_| true).map(|(id, _)| id), Some(berry));

        // Moving it outside patches both regions.
        assert!(mgr.modify_object(berry, |i| i.pos = Point::new(0, 0)));
        assert!(!mgr.region(inside).unwrap().objects().contains(&berry));
        let outside = mgr.region_at(Point::new(0, 0)).unwrap();
        assert_eq!(mgr.region(outside).unwrap().objects(), &[berry]);
        assert_eq!(mgr.objects_at(Point::new(0, 0)), &[berry]);
        assert!(mgr.objects_at(Point::new(5, 5)).is_empty());
    }

    #[test]
    fn pending_requests_coalesce() {
        let (mut grid, doors, mut mgr) = built();
        mgr.add_object(item(0, 0, true));
        grid.set_solid(Point::new(0, 5), true);
        grid.set_solid(Point::new(9, 5), true);
        mgr.request_rebuild(Range::tile(Point::new(0, 5)));
        mgr.request_rebuild(Range::tile(Point::new(9, 5)));
        mgr.request_rebuild(Range::default());
        assert!(mgr.has_pending());
        assert!(mgr.flush(&grid, &doors));
        assert!(!mgr.flush(&grid, &doors));
        let stats = mgr.stats();
        assert_eq!(stats.full_rebuilds, 1);
        assert_eq!(stats.incremental_rebuilds, 1);
        assert_eq!(stats.objects, 1);
        assert_eq!(mgr.region_at(Point::new(9, 5)), None);
        assert!(mgr.find_nearest(Point::new(9, 9), |_| true).is_some());
    }

    #[test]
    fn dirty_rects_at_the_coordinate_limits_are_clipped() {
        let (mut grid, doors, mut mgr) = built();
        grid.set_solid(Point::new(0, 5), true);
        let everything = Range::new(0, 0, i32::MAX, i32::MAX);
        mgr.on_buildings_changed(&grid, &doors, Some(everything));
        mgr.request_rebuild(Range::new(i32::MIN, i32::MIN, 4, 4));
        assert!(mgr.flush(&grid, &doors));
        assert_eq!(mgr.stats().incremental_rebuilds, 2);
        assert_eq!(mgr.region_at(Point::new(0, 5)), None);
        assert!(mgr.is_reachable(Point::new(0, 0), Point::new(9, 9)));
    }

    #[test]
    fn scan_fallback_without_graph() {
        let mut mgr: RegionManager<Item> = RegionManager::default();
        mgr.add_object(item(9, 9, true));
        let near = mgr.add_object(item(1, 1, true));
        assert_eq!(mgr.find_nearest(Point::new(0, 0), |_| true).map(|(id, _)| id), Some(near));
    }

    #[test]
    fn object_ids_are_recycled() {
        let mut mgr: RegionManager<Point> = RegionManager::default();
        let a = mgr.add_object(Point::new(1, 1));
        mgr.add_object(Point::new(2, 2));
        assert_eq!(mgr.remove_object(a), Some(Point::new(1, 1)));
        assert_eq!(mgr.remove_object(a), None);
        assert_eq!(mgr.add_object(Point::new(3, 3)), a);
        assert_eq!(mgr.object_count(), 2);
    }

    /// Region reachability agrees with A* on random maps.
    fn agrees_with_astar(settings: RegionSettings, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = TileGrid::new(20, 16).unwrap();
        for p in grid.bounds() {
            if rng.random_bool(0.35) {
                grid.set_solid(p, true);
            }
        }
        let mut mgr: RegionManager<Point> = RegionManager::new(settings);
        mgr.rebuild_full(&grid, &[]);
        let mut pf = Pathfinder::new(grid.bounds());
        for _ in 0..200 {
            let a = Point::new(rng.random_range(0..20), rng.random_range(0..16));
            let b = Point::new(rng.random_range(0..20), rng.random_range(0..16));
            let found = pf.compute(&grid, &PathRequest::new(a, b)).is_some();
            assert_eq!(mgr.is_reachable(a, b), found, "{a} -> {b}");
        }
    }

    #[test]
    fn reachability_matches_pathfinding() {
        for seed in 0..3 {
            agrees_with_astar(RegionSettings::default(), seed);
            agrees_with_astar(
                RegionSettings {
                    enabled: true,
                    chunk_size: 6,
                },
                seed + 100,
            );
        }
    }
}
