use serde::{Deserialize, Serialize};

/// Linear inertia decay from `start` towards `end` over `iterations` steps.
///
/// Evaluated exactly as written, without clamping: `weight(0) == start` and the
/// last iteration stops one step short of `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertiaSchedule {
    pub start: f64,
    pub end: f64,
    pub iterations: usize,
}

impl InertiaSchedule {
    pub fn new(start: f64, end: f64, iterations: usize) -> Self {
        Self {
            start,
            end,
            iterations,
        }
    }

    #[inline]
    pub fn weight(&self, t: usize) -> f64 {
        self.start - (self.start - self.end) * (t as f64 / self.iterations as f64)
    }
}
