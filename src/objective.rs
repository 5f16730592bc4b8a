use crate::error::SwarmResult;
use crate::optimizer::SwarmMatrix;
use rayon::prelude::*;
use std::fmt::Display;
use tracing::debug;

/// Penalty substituted for candidates that cannot be scored.
pub const DEFAULT_PENALTY: f64 = 1e9;

/// Batched fitness function: the whole N×D swarm in, N fitness values out.
///
/// Lower is better. The optimizer calls it exactly once per iteration and
/// treats any error as fatal to the run.
pub trait ObjectiveFunction {
    fn evaluate(&self, positions: &SwarmMatrix) -> SwarmResult<Vec<f64>>;
}

impl<F> ObjectiveFunction for F
where
    F: Fn(&SwarmMatrix) -> SwarmResult<Vec<f64>>,
{
    fn evaluate(&self, positions: &SwarmMatrix) -> SwarmResult<Vec<f64>> {
        self(positions)
    }
}

/// Lifts a fallible single-candidate scorer into a batched objective.
///
/// Failed or non-finite candidates get `penalty` instead of failing the batch.
/// Candidates are scored in parallel unless `sequential` is set.
pub struct PerCandidate<F> {
    candidate: F,
    penalty: f64,
    parallel: bool,
}

impl<F> PerCandidate<F> {
    pub fn new(candidate: F) -> Self {
        Self {
            candidate,
            penalty: DEFAULT_PENALTY,
            parallel: true,
        }
    }

    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }
}

impl<F, E> PerCandidate<F>
where
    F: Fn(&[f64]) -> Result<f64, E>,
    E: Display,
{
    fn score(&self, candidate: &[f64]) -> f64 {
        match (self.candidate)(candidate) {
            Ok(v) if v.is_finite() => v,
            Ok(v) => {
                debug!("Candidate scored {}, substituting penalty {}", v, self.penalty);
                self.penalty
            }
            Err(e) => {
                debug!("Candidate failed ({}), substituting penalty {}", e, self.penalty);
                self.penalty
            }
        }
    }
}

impl<F, E> ObjectiveFunction for PerCandidate<F>
where
    F: Fn(&[f64]) -> Result<f64, E> + Sync,
    E: Display,
{
    fn evaluate(&self, positions: &SwarmMatrix) -> SwarmResult<Vec<f64>> {
        let fitness = if self.parallel {
            positions.par_rows().map(|row| self.score(row)).collect()
        } else {
            positions.iter_rows().map(|row| self.score(row)).collect()
        };
        Ok(fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_replaces_failures_and_nan() {
        let objective = PerCandidate::new(|x: &[f64]| -> Result<f64, String> {
            if x[0] < 0.0 {
                Err("negative".to_string())
            } else if x[0] == 0.0 {
                Ok(f64::NAN)
            } else {
                Ok(x[0] * 2.0)
            }
        })
        .with_penalty(1e6);

        let positions = SwarmMatrix::from_rows(vec![vec![-1.0], vec![0.0], vec![3.0]]).unwrap();
        assert_eq!(objective.evaluate(&positions).unwrap(), vec![1e6, 1e6, 6.0]);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let f = |x: &[f64]| -> Result<f64, String> { Ok(x.iter().map(|v| v.sin()).sum()) };
        let mut rng = fastrand::Rng::with_seed(3);
        let positions = SwarmMatrix::random(64, 4, &mut rng);
        let par = PerCandidate::new(f).evaluate(&positions).unwrap();
        let seq = PerCandidate::new(f).sequential().evaluate(&positions).unwrap();
        assert_eq!(par, seq);
    }
}
