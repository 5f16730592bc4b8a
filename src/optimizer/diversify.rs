use super::SwarmState;
use crate::bounds::BoundsModel;
use fastrand::Rng;

const RELATIVE_TOLERANCE: f64 = 1e-6;
const ABSOLUTE_TOLERANCE: f64 = 1e-8;

/// Watches the global best and re-seeds the weaker half of the swarm once it
/// has stalled for `patience` consecutive checks.
#[derive(Debug, Clone)]
pub struct StagnationDiversifier {
    patience: usize,
    counter: usize,
    last_best: f64,
    resets: usize,
}

impl StagnationDiversifier {
    pub fn new(patience: usize, initial_best: f64) -> Self {
        Self {
            patience,
            counter: 0,
            last_best: initial_best,
            resets: 0,
        }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn last_best(&self) -> f64 {
        self.last_best
    }

    /// Diversifications triggered so far.
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Feeds one global-best reading. Returns true when the swarm should be
    /// diversified; the counter is already reset in that case.
    pub fn observe(&mut self, best: f64) -> bool {
        if is_close(best, self.last_best) {
            self.counter += 1;
        } else {
            self.counter = 0;
            self.last_best = best;
        }

        if self.counter >= self.patience {
            self.counter = 0;
            self.resets += 1;
            true
        } else {
            false
        }
    }

    /// Observes the state's current global best and diversifies on stagnation.
    /// Returns the indices that were re-seeded, if any.
    pub fn check(
        &mut self,
        state: &mut SwarmState,
        bounds: &BoundsModel,
        rng: &mut Rng,
    ) -> Option<Vec<usize>> {
        if self.observe(state.global_best.fitness) {
            Some(diversify(state, bounds, rng))
        } else {
            None
        }
    }
}

/// Re-seeds the worse half of the swarm (ranked by personal best, stable on
/// ties), never touching the global best's source particle. Reset particles
/// keep their personal best memory.
pub fn diversify(state: &mut SwarmState, bounds: &BoundsModel, rng: &mut Rng) -> Vec<usize> {
    let n = state.len();
    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| state.best_fitness[a].total_cmp(&state.best_fitness[b]));

    let keep = state.global_best.source_index;
    let reset: Vec<usize> = ranked[n / 2..]
        .iter()
        .copied()
        .filter(|&i| i != keep)
        .collect();

    for &i in &reset {
        state.respawn(i, bounds, rng);
    }
    reset
}

#[inline]
fn is_close(current: f64, reference: f64) -> bool {
    (current - reference).abs() <= ABSOLUTE_TOLERANCE + RELATIVE_TOLERANCE * reference.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_closeness() {
        assert!(is_close(1000.0, 1000.0005));
        assert!(!is_close(1000.0, 1000.01));
        assert!(is_close(0.0, 5e-9));
    }

    #[test]
    fn test_improvement_resets_counter() {
        let mut d = StagnationDiversifier::new(3, 10.0);
        assert!(!d.observe(10.0));
        assert!(!d.observe(10.0));
        assert_eq!(d.counter(), 2);
        assert!(!d.observe(9.0));
        assert_eq!(d.counter(), 0);
        assert_eq!(d.last_best(), 9.0);
    }

    #[test]
    fn test_triggers_every_patience_checks() {
        let mut d = StagnationDiversifier::new(2, 1.0);
        let fired: Vec<bool> = (0..6).map(|_| d.observe(1.0)).collect();
        assert_eq!(fired, vec![false, true, false, true, false, true]);
        assert_eq!(d.resets(), 3);
    }
}
