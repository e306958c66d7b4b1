//! Index-based region arena.
//!
//! Regions, rooms and the per-tile lookup are plain vectors addressed by
//! [`RegionId`] / [`RoomId`]; links name their target by id. A rebuild can
//! therefore drop any subset of regions without chasing references.

use std::collections::HashSet;
use std::fmt;

use tilenav_core::{EntityId, Point, Range};

/// Index of a region in the arena. Ids of discarded regions are recycled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Index of a room. Room ids are reassigned on every rebuild.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomId(pub u32);

/// Handle of an object registered with the region manager.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

/// Edge of the region adjacency graph.
///
/// Links are stored on both endpoints. A link touching a door region records
/// that door; locking the door makes the link impermeable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub to: RegionId,
    pub door: Option<EntityId>,
    pub permeable: bool,
}

/// A connected set of passable tiles.
#[derive(Debug, Clone)]
pub struct Region {
    pub(crate) id: RegionId,
    pub(crate) cells: Vec<usize>,
    pub(crate) links: Vec<Link>,
    pub(crate) objects: Vec<ObjectId>,
    pub(crate) room: RoomId,
    pub(crate) touches_edge: bool,
    pub(crate) door: Option<EntityId>,
    pub(crate) bounds: Range,
}

impl Region {
    pub(crate) fn new(id: RegionId, door: Option<EntityId>) -> Self {
        Self {
            id,
            cells: Vec::new(),
            links: Vec::new(),
            objects: Vec::new(),
            room: RoomId::default(),
            touches_edge: false,
            door,
            bounds: Range::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> RegionId {
        self.id
    }

    /// Row-major tile indices belonging to the region.
    #[inline]
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Ids of every adjacent region.
    pub fn neighbors(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.links.iter().map(|l| l.to)
    }

    /// Objects cached for this region.
    #[inline]
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    #[inline]
    pub fn room(&self) -> RoomId {
        self.room
    }

    /// Whether any cell lies on the outer ring of the map.
    #[inline]
    pub fn touches_edge(&self) -> bool {
        self.touches_edge
    }

    /// The door occupying this region, if it is a door region.
    #[inline]
    pub fn door(&self) -> Option<EntityId> {
        self.door
    }

    #[inline]
    pub fn is_door(&self) -> bool {
        self.door.is_some()
    }

    /// Bounding rectangle of the cells.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    pub(crate) fn add_link(&mut self, link: Link) {
        if !self.links.iter().any(|l| l.to == link.to) {
            self.links.push(link);
        }
    }
}

/// A group of regions connected without passing through a door.
#[derive(Debug, Clone, Default)]
pub struct Room {
    pub(crate) id: RoomId,
    pub(crate) regions: Vec<RegionId>,
    pub(crate) cell_count: usize,
    pub(crate) touches_edge: bool,
    pub(crate) doorway: bool,
}

impl Room {
    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[inline]
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Open to the map edge, i.e. "outdoors".
    #[inline]
    pub fn touches_edge(&self) -> bool {
        self.touches_edge
    }

    /// Whether this room is a single door tile.
    #[inline]
    pub fn is_doorway(&self) -> bool {
        self.doorway
    }
}

/// The region graph for one map: regions, rooms and the tile lookup.
#[derive(Debug, Clone)]
pub struct RegionGraph {
    pub(crate) bounds: Range,
    pub(crate) regions: Vec<Option<Region>>,
    pub(crate) free: Vec<u32>,
    pub(crate) tile_region: Vec<Option<RegionId>>,
    pub(crate) rooms: Vec<Room>,
}

impl RegionGraph {
    pub(crate) fn empty(bounds: Range) -> Self {
        Self {
            bounds,
            regions: Vec::new(),
            free: Vec::new(),
            tile_region: vec![None; bounds.len()],
            rooms: Vec::new(),
        }
    }

    /// Extent of the map the graph was built for.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let w = self.bounds.width() as usize;
        Some((p.y - self.bounds.min.y) as usize * w + (p.x - self.bounds.min.x) as usize)
    }

    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let w = self.bounds.width() as usize;
        Point::new(
            (idx % w) as i32 + self.bounds.min.x,
            (idx / w) as i32 + self.bounds.min.y,
        )
    }

    /// Region containing `p`; `None` for solid or out-of-bounds tiles.
    #[inline]
    pub fn region_at(&self, p: Point) -> Option<RegionId> {
        self.tile_region[self.idx(p)?]
    }

    #[inline]
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0 as usize)?.as_ref()
    }

    #[inline]
    pub(crate) fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(id.0 as usize)?.as_mut()
    }

    /// Live regions in id order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions.iter().flatten()
    }

    /// Number of live regions.
    pub fn region_count(&self) -> usize {
        self.regions.len() - self.free.len()
    }

    /// Per-tile region ids, row-major over [`bounds`](Self::bounds).
    #[inline]
    pub fn tile_regions(&self) -> &[Option<RegionId>] {
        &self.tile_region
    }

    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[inline]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0 as usize)
    }

    /// Room containing `p`.
    pub fn room_at(&self, p: Point) -> Option<RoomId> {
        let r = self.region_at(p)?;
        self.region(r).map(|r| r.room)
    }

    pub(crate) fn alloc(&mut self, door: Option<EntityId>) -> RegionId {
        match self.free.pop() {
            Some(slot) => {
                let id = RegionId(slot);
                self.regions[slot as usize] = Some(Region::new(id, door));
                id
            }
            None => {
                let id = RegionId(self.regions.len() as u32);
                self.regions.push(Some(Region::new(id, door)));
                id
            }
        }
    }

    /// Store the cells of a freshly filled region and derive its bounds and
    /// edge flag. The tile lookup must already point at `id`.
    pub(crate) fn finish(&mut self, id: RegionId, cells: Vec<usize>) {
        let bounds = self.bounds;
        let mut rect = Range::default();
        let mut edge = false;
        for &c in &cells {
            let p = self.point(c);
            rect = rect.union(Range::tile(p));
            edge |= bounds.on_border(p);
        }
        if let Some(region) = self.region_mut(id) {
            region.cells = cells;
            region.bounds = rect;
            region.touches_edge = edge;
        }
    }

    /// Recompute link permeability from the set of locked doors.
    pub(crate) fn refresh_permeability(&mut self, locked: &HashSet<EntityId>) {
        let is_locked: Vec<bool> = self
            .regions
            .iter()
            .map(|r| {
                r.as_ref()
                    .and_then(|r| r.door)
                    .is_some_and(|d| locked.contains(&d))
            })
            .collect();
        for region in self.regions.iter_mut().flatten() {
            let own = is_locked[region.id.0 as usize];
            for link in region.links.iter_mut() {
                link.permeable = !own && !is_locked[link.to.0 as usize];
            }
        }
    }

    /// Discard a region: unassign its tiles and drop every link to it.
    /// Returns the removed region.
    pub(crate) fn discard(&mut self, id: RegionId) -> Option<Region> {
        let region = self.regions.get_mut(id.0 as usize)?.take()?;
        for &c in &region.cells {
            self.tile_region[c] = None;
        }
        for link in &region.links {
            if let Some(other) = self.region_mut(link.to) {
                other.links.retain(|l| l.to != id);
            }
        }
        self.free.push(id.0);
        Some(region)
    }
}
