//! End-to-end navigation scenarios over a full [`NavWorld`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tilenav_core::{EntityId, FloorType, Point, Range, TerrainType};
use tilenav_paths::Movement;

use crate::config::NavConfig;
use crate::structure::{Structure, StructureKind};
use crate::world::{NavWorld, ObjectKind, ResourceKind, WorldObject};

fn world(cols: i32, rows: i32) -> NavWorld {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut config = NavConfig::default();
    config.grid.cols = cols;
    config.grid.rows = rows;
    NavWorld::new(config).unwrap()
}

fn wall(id: u64, p: Point) -> Structure {
    Structure::new(EntityId(id), StructureKind::Wall, p)
}

/// Ring of wall structures around `r`, skipping `gaps`. Ids start at `first`.
fn wall_ring(world: &mut NavWorld, r: Range, gaps: &[Point], first: u64) {
    let mut id = first;
    for p in r.iter().filter(|&p| r.on_border(p) && !gaps.contains(&p)) {
        world.add_structure(wall(id, p));
        id += 1;
    }
}

#[test]
fn walled_room_with_one_door() {
    let mut w = world(14, 14);
    let door = Point::new(6, 2);
    wall_ring(&mut w, Range::new(2, 2, 12, 12), &[door], 100);
    w.add_structure(Structure::new(EntityId(1), StructureKind::Door, door));

    let colonist = Point::new(6, 7);
    let target = Point::new(6, 0);
    assert!(w.is_reachable(colonist, target));
    for movement in [Movement::General, Movement::GridAligned] {
        let path = w.compute_path(colonist, target, movement).unwrap();
        assert!(path.contains(door));
    }

    // Swap the door for a wall.
    w.remove_structure(EntityId(1));
    w.add_structure(wall(1, door));
    assert!(!w.is_reachable(colonist, target));
    assert!(w.compute_path(colonist, target, Movement::General).is_none());
    assert!(w.compute_path(colonist, target, Movement::GridAligned).is_none());
}

#[test]
fn road_wins_only_when_detour_is_short() {
    let mut w = world(20, 15);
    w.paint_terrain(0, 0, 20, 15, TerrainType::Mud);
    w.paint_terrain(0, 2, 20, 1, TerrainType::Soil);
    w.paint_floor(0, 2, 20, 1, FloorType::StoneRoad);
    assert_eq!(w.grid().cost_at(Point::new(5, 5)), Some(2.5));
    assert_eq!(w.grid().cost_at(Point::new(5, 2)), Some(0.5));

    let near = w
        .compute_path(Point::new(0, 4), Point::new(19, 4), Movement::General)
        .unwrap();
    assert!(near.tiles().iter().any(|p| p.y == 2));
    assert!(near.cost() < 19.0 * 2.5);

    let far = w
        .compute_path(Point::new(0, 12), Point::new(19, 12), Movement::General)
        .unwrap();
    assert!(far.tiles().iter().all(|p| p.y == 12));
    assert!((far.cost() - 19.0 * 2.5).abs() < 1e-3);
}

#[test]
fn disconnected_regions_skip_the_search() {
    let mut w = world(20, 10);
    for y in 0..10 {
        w.add_structure(wall(y as u64 + 1, Point::new(10, y)));
    }
    w.rebuild_regions();

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..25 {
        let a = Point::new(rng.random_range(0..10), rng.random_range(0..10));
        let b = Point::new(rng.random_range(11..20), rng.random_range(0..10));
        assert!(!w.is_reachable(a, b));
        assert!(w.compute_path(a, b, Movement::General).is_none());
    }
    let stats = w.search_stats();
    assert_eq!(stats.searches, 0);
    assert_eq!(stats.fast_rejects, 25);
}

#[test]
fn removing_the_divider_merges_regions() {
    let mut w = world(20, 10);
    for y in 0..10 {
        w.add_structure(wall(y as u64 + 1, Point::new(10, y)));
    }
    let (a, b) = (Point::new(2, 5), Point::new(17, 5));
    assert!(!w.is_reachable(a, b));
    let before = w.region_stats();
    assert_eq!(before.regions, 2);

    w.remove_structure(EntityId(6));
    assert!(w.is_reachable(a, b));
    let regions = w.regions();
    assert_eq!(regions.region_at(a), regions.region_at(b));
    let after = w.region_stats();
    assert_eq!(after.regions, 1);
    assert_eq!(after.incremental_rebuilds, before.incremental_rebuilds + 1);
    assert!(w.compute_path(a, b, Movement::GridAligned).is_some());
}

/// Region answers never contradict A*, whatever gets built or locked.
#[test]
fn reachability_never_contradicts_pathfinding() {
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut w = world(24, 18);
        let mut next = 1u64;
        for _ in 0..40 {
            let p = Point::new(rng.random_range(0..24), rng.random_range(0..18));
            let len = rng.random_range(2..9);
            let horizontal = rng.random_bool(0.5);
            for i in 0..len {
                let q = if horizontal { p.shift(i, 0) } else { p.shift(0, i) };
                let kind = if rng.random_bool(0.1) {
                    StructureKind::Door
                } else {
                    StructureKind::Wall
                };
                next += 1;
                w.add_structure(Structure::new(EntityId(next), kind, q));
                if kind == StructureKind::Door && rng.random_bool(0.3) {
                    w.set_door_locked(EntityId(next), true);
                }
            }
        }
        if rng.random_bool(0.5) {
            w.paint_terrain(3, 3, 5, 4, TerrainType::DeepWater);
        }

        for _ in 0..150 {
            let a = Point::new(rng.random_range(0..24), rng.random_range(0..18));
            let b = Point::new(rng.random_range(0..24), rng.random_range(0..18));
            let movement = if rng.random_bool(0.5) {
                Movement::General
            } else {
                Movement::GridAligned
            };
            let path = w.compute_path(a, b, movement);
            if !w.is_reachable(a, b) {
                assert!(path.is_none(), "{a} -> {b}");
            }
            if let Some(path) = path {
                assert!(w.is_reachable(a, b));
                assert!(path.tiles().windows(2).all(|s| s[0].is_adjacent(s[1])));
                assert!(path.tiles().iter().all(|&p| w.grid().is_passable(p)));
            }
        }
        assert_eq!(w.search_stats().aborted, 0);
    }
}

/// Object caches patched by incremental rebuilds answer nearest-object
/// queries exactly like a world rebuilt from scratch after every edit.
#[test]
fn nearest_objects_match_a_full_rebuild() {
    let berry = |o: &WorldObject| o.kind == ObjectKind::Resource(ResourceKind::BerryBush);
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(100 + seed);
        let mut inc = world(20, 16);
        let mut full = world(20, 16);
        let mut placed: Vec<EntityId> = Vec::new();
        let mut next = 1u64;
        for step in 0..60 {
            next += 1;
            let id = EntityId(next);
            let p = Point::new(rng.random_range(0..20), rng.random_range(0..16));
            match rng.random_range(0..10) {
                0..=4 => {
                    let kind = if rng.random_bool(0.15) {
                        StructureKind::Door
                    } else {
                        StructureKind::Wall
                    };
                    let w = if kind.is_door() { 1 } else { rng.random_range(1..4) };
                    let s = Structure::new(id, kind, p).with_size(w, 1);
                    inc.add_structure(s);
                    full.add_structure(s);
                    placed.push(id);
                }
                5 | 6 if !placed.is_empty() => {
                    let gone = placed.swap_remove(rng.random_range(0..placed.len()));
                    inc.remove_structure(gone);
                    full.remove_structure(gone);
                }
                _ => {
                    let kind = match rng.random_range(0..3) {
                        0 => ResourceKind::Tree,
                        1 => ResourceKind::Rock,
                        _ => ResourceKind::BerryBush,
                    };
                    inc.add_resource(id, kind, p);
                    full.add_resource(id, kind, p);
                }
            }
            full.rebuild_regions();

            for _ in 0..8 {
                let from = Point::new(rng.random_range(0..20), rng.random_range(0..16));
                assert_eq!(
                    inc.find_nearest(from, berry).map(|o| o.entity),
                    full.find_nearest(from, berry).map(|o| o.entity),
                    "seed {seed} step {step} from {from}"
                );
                assert_eq!(
                    inc.find_nearest(from, |_| true).map(|o| o.entity),
                    full.find_nearest(from, |_| true).map(|o| o.entity),
                    "seed {seed} step {step} from {from}"
                );
            }
        }
        assert!(inc.region_stats().incremental_rebuilds > 0);
        assert_eq!(full.region_stats().incremental_rebuilds, 0);
    }
}
