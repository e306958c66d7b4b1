use tilenav_core::{EntityId, Point, Range};
use tilenav_regions::DoorTile;

/// Kinds of buildable structures the navigation layer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructureKind {
    Wall,
    Door,
    Workbench,
    Bed,
    Stockpile,
    Campfire,
}

impl StructureKind {
    /// Whether a finished structure of this kind blocks movement.
    pub const fn is_solid(self) -> bool {
        matches!(self, StructureKind::Wall | StructureKind::Workbench)
    }

    pub const fn is_door(self) -> bool {
        matches!(self, StructureKind::Door)
    }

    /// Whether agents look this kind up with nearest-object queries.
    pub const fn is_point_of_interest(self) -> bool {
        !matches!(self, StructureKind::Wall | StructureKind::Door)
    }
}

/// A placed structure: position, footprint, completion flag and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    pub id: EntityId,
    pub kind: StructureKind,
    /// Top-left tile of the footprint.
    pub pos: Point,
    /// Footprint size in tiles.
    pub size: Point,
    pub complete: bool,
}

impl Structure {
    /// A finished 1x1 structure.
    pub fn new(id: EntityId, kind: StructureKind, pos: Point) -> Self {
        Self {
            id,
            kind,
            pos,
            size: Point::new(1, 1),
            complete: true,
        }
    }

    pub fn with_size(mut self, w: i32, h: i32) -> Self {
        self.size = Point::new(w, h);
        self
    }

    /// Mark as a construction site.
    pub fn unfinished(mut self) -> Self {
        self.complete = false;
        self
    }

    /// Tiles covered by the structure.
    pub fn footprint(&self) -> Range {
        Range::from_rect(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Whether the structure currently blocks movement. Unfinished
    /// structures never do.
    pub fn blocks(&self) -> bool {
        self.complete && self.kind.is_solid()
    }

    /// Door tiles contributed by a finished door.
    pub fn door_tiles(&self) -> impl Iterator<Item = DoorTile> + '_ {
        let active = self.complete && self.kind.is_door();
        self.footprint()
            .iter()
            .filter(move |_| active)
            .map(|p| DoorTile::new(self.id, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert!(StructureKind::Wall.is_solid());
        assert!(StructureKind::Workbench.is_solid());
        assert!(!StructureKind::Door.is_solid());
        assert!(!StructureKind::Bed.is_solid());
        assert!(StructureKind::Campfire.is_point_of_interest());
        assert!(!StructureKind::Wall.is_point_of_interest());
        assert!(!StructureKind::Door.is_point_of_interest());
    }

    #[test]
    fn unfinished_structures_never_block() {
        let wall =
            Structure::new(EntityId(1), StructureKind::Wall, Point::new(2, 3)).with_size(3, 1);
        assert!(wall.blocks());
        assert_eq!(wall.footprint(), Range::new(2, 3, 5, 4));
        assert!(!wall.unfinished().blocks());
    }

    #[test]
    fn only_finished_doors_have_door_tiles() {
        let door =
            Structure::new(EntityId(7), StructureKind::Door, Point::new(1, 1)).with_size(2, 1);
        let tiles: Vec<DoorTile> = door.door_tiles().collect();
        assert_eq!(tiles, vec![
            DoorTile::new(EntityId(7), Point::new(1, 1)),
            DoorTile::new(EntityId(7), Point::new(2, 1)),
        ]);
        assert_eq!(door.unfinished().door_tiles().count(), 0);
        let bed = Structure::new(EntityId(8), StructureKind::Bed, Point::new(0, 0));
        assert_eq!(bed.door_tiles().count(), 0);
    }
}
