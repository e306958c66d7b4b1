//! Text renderings for logs and the demo binary.

use std::collections::HashSet;

use tilenav_core::{FloorType, Point, TerrainType};
use tilenav_paths::Path;

use crate::structure::StructureKind;
use crate::world::{NavWorld, ObjectKind, ResourceKind};

/// Draw the map, one character per tile, optionally overlaying a path.
///
/// `#` wall or impassable, `+` door (`X` when locked), `~` water, `,` mud
/// or marsh, `=` road, `*` path, letters for points of interest.
pub fn render_world(world: &NavWorld, path: Option<&Path>) -> String {
    let grid = world.grid();
    let on_path: HashSet<Point> = path
        .map(|p| p.tiles().iter().copied().collect())
        .unwrap_or_default();

    let mut glyphs = vec![' '; grid.len()];
    for (i, g) in glyphs.iter_mut().enumerate() {
        let p = grid.point(i);
        *g = if grid.is_solid(p) {
            match world.terrain().terrain_at(p) {
                Some(TerrainType::DeepWater) => '~',
                _ => '#',
            }
        } else {
            terrain_glyph(world, p)
        };
    }
    for s in world.structures() {
        let glyph = match (s.kind, s.complete) {
            (StructureKind::Door, true) if world.is_door_locked(s.id) => 'X',
            (StructureKind::Door, true) => '+',
            (StructureKind::Workbench, _) => 'W',
            (StructureKind::Bed, _) => 'B',
            (StructureKind::Stockpile, _) => 'S',
            (StructureKind::Campfire, _) => 'F',
            _ => continue,
        };
        for p in s.footprint() {
            if let Some(i) = grid.idx(p) {
                glyphs[i] = glyph;
            }
        }
    }
    for (_, o) in world.regions().objects() {
        if let ObjectKind::Resource(kind) = o.kind {
            if let Some(i) = grid.idx(o.pos) {
                glyphs[i] = match kind {
                    ResourceKind::Tree => 'T',
                    ResourceKind::Rock => 'R',
                    ResourceKind::BerryBush => 'b',
                };
            }
        }
    }
    for &p in &on_path {
        if let Some(i) = grid.idx(p) {
            glyphs[i] = '*';
        }
    }

    let cols = grid.cols() as usize;
    let mut out = String::with_capacity(glyphs.len() + grid.rows() as usize);
    for row in glyphs.chunks(cols) {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}

fn terrain_glyph(world: &NavWorld, p: Point) -> char {
    let terrain = world.terrain();
    match (terrain.floor_at(p), terrain.terrain_at(p)) {
        (Some(FloorType::StoneRoad), _) => '=',
        (Some(FloorType::WoodPlank | FloorType::Carpet), _) => '_',
        (_, Some(TerrainType::ShallowWater)) => '~',
        (_, Some(TerrainType::Mud | TerrainType::Marsh)) => ',',
        (_, Some(TerrainType::Sand | TerrainType::Gravel)) => ':',
        _ => '.',
    }
}
