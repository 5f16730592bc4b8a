use super::{SwarmMatrix, SwarmState};
use crate::error::{SwarmError, SwarmResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which particles a particle learns from. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Everyone follows the swarm's global best.
    Global,
    /// Each particle follows the best of the `neighbors` consecutive ring slots
    /// centred on itself.
    Ring { neighbors: usize },
}

impl Topology {
    pub fn ring(neighbors: usize, particles: usize) -> SwarmResult<Self> {
        let topology = Topology::Ring { neighbors };
        topology.validate(particles)?;
        Ok(topology)
    }

    pub fn validate(&self, particles: usize) -> SwarmResult<()> {
        match *self {
            Topology::Global => Ok(()),
            Topology::Ring { neighbors: k } => {
                if k == 0 {
                    return Err(SwarmError::config("ring neighbourhood size must be >= 1"));
                }
                if k % 2 == 0 {
                    return Err(SwarmError::config(format!(
                        "ring neighbourhood size must be odd, got {}",
                        k
                    )));
                }
                if k >= particles {
                    return Err(SwarmError::config(format!(
                        "ring neighbourhood size {} must be smaller than the swarm ({})",
                        k, particles
                    )));
                }
                Ok(())
            }
        }
    }

    /// Ring slots visible from particle `i`, in traversal order
    /// `[i - k/2, ..., i, ..., i + k/2]` (mod N).
    pub fn neighborhood(&self, i: usize, particles: usize) -> Vec<usize> {
        match *self {
            Topology::Global => (0..particles).collect(),
            Topology::Ring { neighbors } => {
                let half = (neighbors / 2) as isize;
                let n = particles as isize;
                (-half..=half)
                    .map(|offset| (i as isize + offset).rem_euclid(n) as usize)
                    .collect()
            }
        }
    }

    /// Neighbour with the lowest personal best; earliest in traversal order on ties.
    pub fn best_neighbor(&self, i: usize, best_fitness: &[f64]) -> usize {
        let hood = self.neighborhood(i, best_fitness.len());
        let mut best = hood[0];
        for &j in &hood[1..] {
            if best_fitness[j] < best_fitness[best] {
                best = j;
            }
        }
        best
    }

    /// The position each particle is pulled towards this iteration.
    pub fn social_bests(&self, state: &SwarmState) -> SwarmMatrix {
        match self {
            Topology::Global => SwarmMatrix::broadcast(&state.global_best.position, state.len()),
            Topology::Ring { .. } => {
                let mut social = SwarmMatrix::zeros(state.len(), state.dimensions());
                for i in 0..state.len() {
                    let j = self.best_neighbor(i, &state.best_fitness);
                    social.row_mut(i).copy_from_slice(state.best_positions.row(j));
                }
                social
            }
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Global => write!(f, "global"),
            Topology::Ring { neighbors } => write!(f, "ring(k={})", neighbors),
        }
    }
}
