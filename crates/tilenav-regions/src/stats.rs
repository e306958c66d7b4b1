use std::fmt;

use tilenav_core::Point;

use crate::region::RegionGraph;

/// Summary of a region graph.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionStats {
    pub regions: usize,
    pub rooms: usize,
    pub door_regions: usize,
    /// Passable tiles covered by regions.
    pub cells: usize,
    pub average_region_size: f32,
    pub objects: usize,
    pub full_rebuilds: u64,
    pub incremental_rebuilds: u64,
}

impl RegionStats {
    pub fn of(graph: &RegionGraph) -> Self {
        let mut stats = Self {
            rooms: graph.rooms().len(),
            ..Self::default()
        };
        for r in graph.regions() {
            stats.regions += 1;
            stats.cells += r.len();
            if r.is_door() {
                stats.door_regions += 1;
            }
        }
        if stats.regions > 0 {
            stats.average_region_size = stats.cells as f32 / stats.regions as f32;
        }
        stats
    }
}

impl fmt::Display for RegionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} regions ({} doors) in {} rooms, {:.1} tiles/region, {} objects, ",
            self.regions,
            self.door_regions,
            self.rooms,
            self.average_region_size,
            self.objects,
        )?;
        write!(
            f,
            "rebuilds: {} full / {} incremental",
            self.full_rebuilds,
            self.incremental_rebuilds
        )
    }
}

const GLYPHS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Render the tile-to-region map as text, one line per row.
///
/// Solid tiles are `#`, door regions `+`, other regions cycle through
/// digits and letters by id.
pub fn render_regions(graph: &RegionGraph) -> String {
    let bounds = graph.bounds();
    let mut out = String::with_capacity(bounds.len() + bounds.height().max(0) as usize);
    for y in bounds.min.y..bounds.max.y {
        for x in bounds.min.x..bounds.max.x {
            let c = match graph.region_at(Point::new(x, y)) {
                None => '#',
                Some(id) if graph.region(id).is_some_and(|r| r.is_door()) => '+',
                Some(id) => GLYPHS[id.0 as usize % GLYPHS.len()] as char,
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}
