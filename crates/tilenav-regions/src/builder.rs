//! Region construction: full builds and dirty-rectangle rebuilds.

use std::collections::{HashMap, HashSet, VecDeque};

use tilenav_core::{EntityId, Point, Range, TileGrid};

use crate::region::{Link, ObjectId, RegionGraph, RegionId, Room, RoomId};

/// A door occupying one tile. Complete doors become singleton regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoorTile {
    pub id: EntityId,
    pub pos: Point,
}

impl DoorTile {
    pub fn new(id: EntityId, pos: Point) -> Self {
        Self { id, pos }
    }
}

/// Region system settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RegionSettings {
    /// When false every reachability query answers `true`.
    pub enabled: bool,
    /// Side of the square chunks regions may not cross. 0 disables chunking.
    pub chunk_size: u32,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            chunk_size: 0,
        }
    }
}

/// What an incremental rebuild touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Regions discarded. Their ids may reappear in `created`.
    pub removed: Vec<RegionId>,
    pub created: Vec<RegionId>,
    /// Objects that were cached in a discarded region.
    pub displaced: Vec<ObjectId>,
    /// Tiles re-flooded.
    pub cells: usize,
}

/// Builds and repairs a [`RegionGraph`] from a [`TileGrid`].
///
/// The builder owns the flood-fill stack and the door lookup so repeated
/// rebuilds allocate little.
#[derive(Debug, Clone, Default)]
pub struct RegionBuilder {
    chunk: i32,
    stack: Vec<usize>,
    door_at: HashMap<usize, EntityId>,
}

impl RegionBuilder {
    pub fn new(settings: &RegionSettings) -> Self {
        Self {
            chunk: settings.chunk_size.min(i32::MAX as u32) as i32,
            stack: Vec::new(),
            door_at: HashMap::new(),
        }
    }

    /// Chunk side in tiles, 0 when regions are unbounded.
    pub fn chunk_size(&self) -> u32 {
        self.chunk as u32
    }

    /// Partition the whole grid into regions.
    pub fn build_full(
        &mut self,
        grid: &TileGrid,
        doors: &[DoorTile],
        locked: &HashSet<EntityId>,
    ) -> RegionGraph {
        let mut graph = RegionGraph::empty(grid.bounds());
        self.index_doors(grid, doors);
        let cells: Vec<usize> = (0..grid.len()).collect();
        let created = self.fill(&mut graph, grid, &cells);
        link_regions(&mut graph, &created, locked);
        assign_rooms(&mut graph);
        log::debug!(
            "built {} regions in {} rooms over {}x{}",
            graph.region_count(),
            graph.rooms.len(),
            grid.cols(),
            grid.rows()
        );
        graph
    }

    /// Repair `graph` after the tiles inside `dirty` changed.
    ///
    /// Every region with a cell in `dirty` grown by one tile is discarded
    /// and the freed area is flooded again. Regions elsewhere keep their id,
    /// their cells and their links to each other.
    pub fn rebuild_area(
        &mut self,
        graph: &mut RegionGraph,
        grid: &TileGrid,
        doors: &[DoorTile],
        locked: &HashSet<EntityId>,
        dirty: Range,
    ) -> RebuildReport {
        let area = dirty
            .intersect(graph.bounds.expand(1))
            .expand(1)
            .intersect(graph.bounds);
        if area.is_empty() {
            return RebuildReport::default();
        }
        self.index_doors(grid, doors);

        let mut removed: Vec<RegionId> = area.iter().filter_map(|p| graph.region_at(p)).collect();
        removed.sort_unstable();
        removed.dedup();

        let mut cells: Vec<usize> = area.iter().filter_map(|p| graph.idx(p)).collect();
        let mut displaced = Vec::new();
        for &id in &removed {
            if let Some(region) = graph.discard(id) {
                cells.extend(region.cells);
                displaced.extend(region.objects);
            }
        }
        displaced.sort_unstable();
        displaced.dedup();
        cells.sort_unstable();
        cells.dedup();

        let created = self.fill(graph, grid, &cells);
        link_regions(graph, &created, locked);
        assign_rooms(graph);
        log::debug!(
            "rebuilt {:?}: {} regions replaced by {}, {} tiles",
            dirty,
            removed.len(),
            created.len(),
            cells.len()
        );
        RebuildReport {
            removed,
            created,
            displaced,
            cells: cells.len(),
        }
    }

    fn index_doors(&mut self, grid: &TileGrid, doors: &[DoorTile]) {
        self.door_at.clear();
        for door in doors {
            if let Some(i) = grid.idx(door.pos) {
                self.door_at.insert(i, door.id);
            }
        }
    }

    #[inline]
    fn same_chunk(&self, a: Point, b: Point) -> bool {
        self.chunk <= 0
            || (a.x.div_euclid(self.chunk) == b.x.div_euclid(self.chunk)
                && a.y.div_euclid(self.chunk) == b.y.div_euclid(self.chunk))
    }

    /// Create regions covering every unassigned passable tile of `cells`.
    /// Door tiles come first so floods never swallow them.
    fn fill(&mut self, graph: &mut RegionGraph, grid: &TileGrid, cells: &[usize]) -> Vec<RegionId> {
        let solid = grid.solid();
        let mut created = Vec::new();

        for &c in cells {
            if solid[c] || graph.tile_region[c].is_some() {
                continue;
            }
            if let Some(&door) = self.door_at.get(&c) {
                let id = graph.alloc(Some(door));
                graph.tile_region[c] = Some(id);
                graph.finish(id, vec![c]);
                created.push(id);
            }
        }

        for &start in cells {
            if solid[start] || graph.tile_region[start].is_some() {
                continue;
            }
            let id = graph.alloc(None);
            let mut members = vec![start];
            graph.tile_region[start] = Some(id);

            // Iterative DFS over 4-neighbors.
            self.stack.clear();
            self.stack.push(start);
            while let Some(ci) = self.stack.pop() {
                let cp = graph.point(ci);
                for np in cp.neighbors_4() {
                    let Some(ni) = grid.idx(np) else {
                        continue;
                    };
                    if solid[ni]
                        || graph.tile_region[ni].is_some()
                        || self.door_at.contains_key(&ni)
                        || !self.same_chunk(cp, np)
                    {
                        continue;
                    }
                    graph.tile_region[ni] = Some(id);
                    members.push(ni);
                    self.stack.push(ni);
                }
            }

            members.sort_unstable();
            graph.finish(id, members);
            created.push(id);
        }

        created
    }
}

/// Link every region in `created` to each region it touches orthogonally.
fn link_regions(graph: &mut RegionGraph, created: &[RegionId], locked: &HashSet<EntityId>) {
    let mut touching = Vec::new();
    for &id in created {
        touching.clear();
        let Some(region) = graph.region(id) else {
            continue;
        };
        for &c in &region.cells {
            for n in graph.point(c).neighbors_4() {
                match graph.region_at(n) {
                    Some(other) if other != id => touching.push(other),
                    _ => {}
                }
            }
        }
        touching.sort_unstable();
        touching.dedup();
        for &other in &touching {
            connect(graph, id, other, locked);
        }
    }
}

fn connect(graph: &mut RegionGraph, a: RegionId, b: RegionId, locked: &HashSet<EntityId>) {
    let door_a = graph.region(a).and_then(|r| r.door);
    let door_b = graph.region(b).and_then(|r| r.door);
    let permeable = !door_a.is_some_and(|d| locked.contains(&d))
        && !door_b.is_some_and(|d| locked.contains(&d));
    if let Some(r) = graph.region_mut(a) {
        r.add_link(Link {
            to: b,
            door: door_b.or(door_a),
            permeable,
        });
    }
    if let Some(r) = graph.region_mut(b) {
        r.add_link(Link {
            to: a,
            door: door_a.or(door_b),
            permeable,
        });
    }
}

/// Group regions into rooms: a room is a maximal set of non-door regions
/// connected through links; every door region is a room of its own.
pub(crate) fn assign_rooms(graph: &mut RegionGraph) {
    let mut room_of: Vec<Option<RoomId>> = vec![None; graph.regions.len()];
    let mut rooms = Vec::new();
    let mut queue = VecDeque::new();

    for region in graph.regions.iter().flatten() {
        if room_of[region.id.0 as usize].is_some() {
            continue;
        }
        let mut room = Room {
            id: RoomId(rooms.len() as u32),
            doorway: region.is_door(),
            ..Room::default()
        };
        room_of[region.id.0 as usize] = Some(room.id);
        queue.push_back(region.id);

        while let Some(cur) = queue.pop_front() {
            let Some(r) = graph.region(cur) else {
                continue;
            };
            room.regions.push(cur);
            room.cell_count += r.len();
            room.touches_edge |= r.touches_edge;
            if r.is_door() {
                continue;
            }
            for link in &r.links {
                let slot = link.to.0 as usize;
                let open = graph.region(link.to).is_some_and(|n| !n.is_door());
                if open && room_of[slot].is_none() {
                    room_of[slot] = Some(room.id);
                    queue.push_back(link.to);
                }
            }
        }
        rooms.push(room);
    }

    for region in graph.regions.iter_mut().flatten() {
        if let Some(room) = room_of[region.id.0 as usize] {
            region.room = room;
        }
    }
    graph.rooms = rooms;
}
