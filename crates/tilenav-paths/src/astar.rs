use std::collections::BinaryHeap;

use tilenav_core::Point;

use crate::Pathfinder;
use crate::pathfinder::NodeRef;
use crate::traits::AstarPather;

impl Pathfinder {
    /// Compute the cheapest path from `from` to `to` using A*.
    ///
    /// Returns the full tile path (both endpoints included) and its cost, or
    /// `None` if no path exists inside the range or the search expanded more
    /// than [`SearchLimits::max_iterations`](crate::SearchLimits) nodes.
    ///
    /// Passability of the endpoints is the pather's business: a pather that
    /// never lists `to` as a neighbor simply yields `None`.
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
    ) -> Option<(Vec<Point>, f32)> {
        let start_idx = self.idx(from)?;
        let goal_idx = self.idx(to)?;

        if start_idx == goal_idx {
            return Some((vec![from], 0.0));
        }

        self.stats.searches += 1;

        // Bump generation to lazily invalidate all nodes.
        self.generation = self.generation.wrapping_add(1);
        let cur_gen = self.generation;
        let mut seq: u64 = 0;

        {
            let node = &mut self.nodes[start_idx];
            node.g = 0.0;
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
        }

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: pather.estimate(from, to),
            seq,
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);
        let max_iterations = self.limits.max_iterations;
        let mut expanded = 0usize;

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };

            let ci = current.idx;

            // Skip stale entries.
            if self.nodes[ci].generation != cur_gen || !self.nodes[ci].open {
                continue;
            }

            if ci == goal_idx {
                break 'search true;
            }

            if expanded >= max_iterations {
                log::warn!(
                    "A* from {} to {} gave up after {} expansions",
                    from,
                    to,
                    expanded
                );
                self.stats.aborted += 1;
                break 'search false;
            }
            expanded += 1;

            self.nodes[ci].open = false;
            let current_g = self.nodes[ci].g;
            let current_point = self.point(ci);

            nbuf.clear();
            pather.neighbors(current_point, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + pather.cost(current_point, np);

                let n = &mut self.nodes[ni];
                if n.generation == cur_gen {
                    if tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                }

                n.g = tentative_g;
                n.parent = ci;
                n.open = true;

                seq += 1;
                open.push(NodeRef {
                    idx: ni,
                    f: tentative_g + pather.estimate(np, to),
                    seq,
                });
            }
        };

        self.nbuf = nbuf;
        self.stats.expanded += expanded as u64;

        if !found {
            log::trace!("A* {} -> {}: no path ({} expanded)", from, to, expanded);
            return None;
        }

        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            path.push(self.point(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        let cost = self.nodes[goal_idx].g;
        log::trace!(
            "A* {} -> {}: {} steps, cost {:.2} ({} expanded)",
            from,
            to,
            path.len(),
            cost,
            expanded
        );
        Some((path, cost))
    }
}
