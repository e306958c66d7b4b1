//! When should an agent ask for a fresh path?
//!
//! The pathfinder never decides this. Recomputing every tick makes agents
//! on grid-aligned paths jitter between equally cheap routes, so callers
//! keep a [`RepathState`] per agent and consult a shared [`RepathPolicy`].

use tilenav_core::Point;
use tilenav_paths::euclidean;

/// Thresholds that trigger a new path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepathPolicy {
    /// Tiles the goal must move before the old path is stale.
    pub goal_threshold: f32,
    /// Seconds after which a path is refreshed regardless.
    pub interval: f32,
}

impl Default for RepathPolicy {
    fn default() -> Self {
        Self {
            goal_threshold: 1.5,
            interval: 2.0,
        }
    }
}

impl RepathPolicy {
    /// Whether `state` needs a new path toward `goal` at time `now`.
    pub fn should_repath(&self, state: &RepathState, goal: Point, now: f64) -> bool {
        let Some((last_goal, at)) = state.last else {
            return true;
        };
        euclidean(last_goal, goal) > self.goal_threshold || now - at >= f64::from(self.interval)
    }
}

/// Per-agent record of the last path request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RepathState {
    last: Option<(Point, f64)>,
}

impl RepathState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember that a path toward `goal` was computed at `now`.
    pub fn record(&mut self, goal: Point, now: f64) {
        self.last = Some((goal, now));
    }

    /// Forget the last request, forcing the next check to repath.
    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn last_goal(&self) -> Option<Point> {
        self.last.map(|(g, _)| g)
    }
}
