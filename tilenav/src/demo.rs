//! Random demo maps: terrain patches, a road and a walled compound.

use rand::Rng;
use tilenav_core::{EntityId, FloorType, Point, Range, TerrainType};

use crate::structure::{Structure, StructureKind};
use crate::world::{NavWorld, ResourceKind};

/// What [`generate`] placed, for the caller to query against.
#[derive(Debug, Clone, Default)]
pub struct DemoLayout {
    /// Interior of the compound (inside the walls), if one fit.
    pub compound: Option<Range>,
    pub doors: Vec<EntityId>,
    /// A passable tile outside the compound.
    pub outside: Option<Point>,
}

/// Populate `world` with a random but valid layout.
pub fn generate<R: Rng>(world: &mut NavWorld, rng: &mut R) -> DemoLayout {
    let (cols, rows) = (world.grid().cols(), world.grid().rows());
    let mut next_id = 1u64;
    let mut id = || {
        next_id += 1;
        EntityId(next_id)
    };

    // Terrain patches.
    for _ in 0..(cols * rows / 150).max(1) {
        let kind = match rng.random_range(0..4) {
            0 => TerrainType::Marsh,
            1 => TerrainType::Mud,
            2 => TerrainType::Sand,
            _ => TerrainType::ShallowWater,
        };
        let (w, h) = (rng.random_range(2..7), rng.random_range(2..5));
        world.paint_terrain(rng.random_range(0..cols), rng.random_range(0..rows), w, h, kind);
    }
    if cols >= 12 && rows >= 12 {
        let (x, y) = (rng.random_range(0..cols - 4), rng.random_range(0..rows - 4));
        world.paint_terrain(x, y, 3, 3, TerrainType::DeepWater);
    }
    let road_y = rows / 2 + rows / 4;
    world.paint_terrain(0, road_y, cols, 1, TerrainType::Soil);
    world.paint_floor(0, road_y, cols, 1, FloorType::StoneRoad);

    let mut layout = DemoLayout::default();

    // Compound walls with a door on the south side and one on the west.
    let (w, h) = ((cols / 3).max(5), (rows / 3).max(5));
    if cols >= w + 4 && rows >= h + 4 {
        let x0 = (cols - w) / 2;
        let y0 = (rows / 4 - h / 2).max(1);
        let outer = Range::from_rect(x0, y0, w, h);
        world.paint_terrain(x0, y0, w, h, TerrainType::Soil);
        world.paint_floor(x0 + 1, y0 + 1, w - 2, h - 2, FloorType::WoodPlank);

        let south = Point::new(x0 + w / 2, y0 + h - 1);
        let west = Point::new(x0, y0 + h / 2);
        for p in outer.iter().filter(|&p| outer.on_border(p)) {
            if p == south || p == west {
                let door = id();
                world.add_structure(Structure::new(door, StructureKind::Door, p));
                layout.doors.push(door);
            } else {
                world.add_structure(Structure::new(id(), StructureKind::Wall, p));
            }
        }

        let inner = outer.expand(-1);
        world.add_structure(Structure::new(id(), StructureKind::Workbench, inner.min));
        let bed = Point::new(inner.max.x - 1, inner.min.y);
        world.add_structure(Structure::new(id(), StructureKind::Bed, bed));
        let fire = Point::new(inner.min.x + 1, inner.max.y - 1);
        world.add_structure(Structure::new(id(), StructureKind::Campfire, fire).unfinished());
        layout.compound = Some(inner);
    }

    // Resources on free outside tiles.
    for _ in 0..(cols * rows / 60).max(3) {
        let p = Point::new(rng.random_range(0..cols), rng.random_range(0..rows));
        let inside = layout.compound.is_some_and(|c| c.expand(1).contains(p));
        if inside || world.grid().is_solid(p) {
            continue;
        }
        let kind = match rng.random_range(0..3) {
            0 => ResourceKind::Tree,
            1 => ResourceKind::Rock,
            _ => ResourceKind::BerryBush,
        };
        world.add_resource(id(), kind, p);
    }

    layout.outside = (0..rows)
        .rev()
        .flat_map(|y| (0..cols).map(move |x| Point::new(x, y)))
        .find(|&p| {
            !world.grid().is_solid(p) && !layout.compound.is_some_and(|c| c.expand(1).contains(p))
        });

    log::debug!(
        "demo layout: {} structures, compound {:?}",
        world.structures().count(),
        layout.compound
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tilenav_paths::Movement;

    #[test]
    fn compound_is_reachable_through_its_doors() {
        for seed in 0..5 {
            let mut config = NavConfig::default();
            config.grid.cols = 40;
            config.grid.rows = 30;
            let mut world = NavWorld::new(config).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = generate(&mut world, &mut rng);
            world.rebuild_regions();

            let inner = layout.compound.unwrap();
            let outside = layout.outside.unwrap();
            let centre = Point::new(
                (inner.min.x + inner.max.x) / 2,
                (inner.min.y + inner.max.y) / 2,
            );
            assert_eq!(layout.doors.len(), 2);
            let room = world.regions().room_at(centre).unwrap();
            assert!(!world.regions().room(room).unwrap().touches_edge());

            for &door in &layout.doors {
                world.set_door_locked(door, true);
            }
            assert!(!world.is_reachable(centre, outside));
            assert!(world.compute_path(centre, outside, Movement::GridAligned).is_none());

            world.set_door_locked(layout.doors[0], false);
            assert_eq!(
                world.is_reachable(centre, outside),
                world.compute_path(centre, outside, Movement::GridAligned).is_some()
            );
        }
    }
}
