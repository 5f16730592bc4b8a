pub mod diversify;
pub mod inertia;
pub mod runner;
pub mod topology;

pub use self::diversify::StagnationDiversifier;
pub use self::inertia::InertiaSchedule;
pub use self::runner::{OptimizationOptions, OptimizationResult, Optimizer, RunLog, SwarmRun};
pub use self::topology::Topology;

use crate::bounds::BoundsModel;
use crate::error::{SwarmError, SwarmResult};
use crate::objective::ObjectiveFunction;
use fastrand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Dense row-major N×D matrix. One row per particle, one column per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SwarmMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> SwarmResult<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(SwarmError::config(format!(
                "row {} has {} columns, expected {}",
                i,
                r.len(),
                cols
            )));
        }
        let n = rows.len();
        Ok(Self {
            rows: n,
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Matrix of independent uniform draws in `[0, 1)`.
    pub fn random(rows: usize, cols: usize, rng: &mut Rng) -> Self {
        let data = std::iter::repeat_with(|| rng.f64())
            .take(rows * cols)
            .collect();
        Self { rows, cols, data }
    }

    /// `rows` copies of the same vector.
    pub fn broadcast(row: &[f64], rows: usize) -> Self {
        let mut data = Vec::with_capacity(rows * row.len());
        for _ in 0..rows {
            data.extend_from_slice(row);
        }
        Self {
            rows,
            cols: row.len(),
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    pub fn par_rows(&self) -> impl IndexedParallelIterator<Item = &[f64]> {
        self.data.par_chunks_exact(self.cols.max(1))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }
}

/// Best personal best across the swarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalBest {
    pub position: Vec<f64>,
    pub fitness: f64,
    pub source_index: usize,
}

/// Acceleration coefficients for one move step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCoefficients {
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,
}

/// Column-wise state of a whole swarm, owned by exactly one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmState {
    pub positions: SwarmMatrix,
    pub velocities: SwarmMatrix,
    pub best_positions: SwarmMatrix,
    pub best_fitness: Vec<f64>,
    pub global_best: GlobalBest,
}

impl SwarmState {
    /// Random positions inside `bounds`, velocities in `[-span, +span]`, and
    /// personal bests seeded from a single batched evaluation.
    pub fn initialize<F>(
        particles: usize,
        bounds: &BoundsModel,
        objective: &F,
        rng: &mut Rng,
    ) -> SwarmResult<Self>
    where
        F: ObjectiveFunction + ?Sized,
    {
        if particles == 0 {
            return Err(SwarmError::config("swarm needs at least one particle"));
        }
        let dims = bounds.dimensions();

        let mut positions = SwarmMatrix::zeros(particles, dims);
        for i in 0..particles {
            bounds.sample_into(rng, positions.row_mut(i));
        }

        let mut velocities = SwarmMatrix::zeros(particles, dims);
        for i in 0..particles {
            for (d, v) in velocities.row_mut(i).iter_mut().enumerate() {
                let span = bounds.span(d);
                *v = -span + 2.0 * span * rng.f64();
            }
        }

        let fitness = evaluate_checked(objective, &positions)?;
        Self::from_parts(positions, velocities, fitness)
    }

    /// Builds a state whose personal bests are the given positions and fitness.
    pub fn from_parts(
        positions: SwarmMatrix,
        velocities: SwarmMatrix,
        fitness: Vec<f64>,
    ) -> SwarmResult<Self> {
        if positions.rows() == 0 || positions.cols() == 0 {
            return Err(SwarmError::config("swarm must have N >= 1 and D >= 1"));
        }
        if velocities.rows() != positions.rows() || velocities.cols() != positions.cols() {
            return Err(SwarmError::config("velocity matrix shape differs from positions"));
        }
        if fitness.len() != positions.rows() {
            return Err(SwarmError::FitnessShape {
                expected: positions.rows(),
                actual: fitness.len(),
            });
        }

        let source_index = argmin(&fitness);
        let global_best = GlobalBest {
            position: positions.row(source_index).to_vec(),
            fitness: fitness[source_index],
            source_index,
        };

        Ok(Self {
            best_positions: positions.clone(),
            positions,
            velocities,
            best_fitness: fitness,
            global_best,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimensions(&self) -> usize {
        self.positions.cols()
    }

    /// Strict improvement only; ties keep the earlier personal best.
    /// Returns how many particles improved.
    pub fn update_personal_bests(&mut self, fitness: &[f64]) -> usize {
        let mut improved = 0;
        for (i, &f) in fitness.iter().enumerate() {
            if f < self.best_fitness[i] {
                self.best_fitness[i] = f;
                let dims = self.positions.cols();
                self.best_positions.data[i * dims..(i + 1) * dims]
                    .copy_from_slice(self.positions.row(i));
                improved += 1;
            }
        }
        improved
    }

    /// Replaces the global best only when the arg-min personal best is strictly better.
    pub fn update_global_best(&mut self) -> bool {
        let idx = argmin(&self.best_fitness);
        if self.best_fitness[idx] < self.global_best.fitness {
            self.global_best = GlobalBest {
                position: self.best_positions.row(idx).to_vec(),
                fitness: self.best_fitness[idx],
                source_index: idx,
            };
            true
        } else {
            false
        }
    }

    /// Velocity and position update for every particle.
    ///
    /// `r1` and `r2` are N×D matrices of uniform draws. Only the resulting
    /// position is clipped; the velocity keeps its unclamped value.
    pub fn advance(
        &mut self,
        social_best: &SwarmMatrix,
        coeffs: MotionCoefficients,
        r1: &SwarmMatrix,
        r2: &SwarmMatrix,
        bounds: &BoundsModel,
    ) {
        let dims = self.dimensions();
        for i in 0..self.len() {
            let base = i * dims;
            for d in 0..dims {
                let k = base + d;
                let x = self.positions.data[k];
                let cognitive = coeffs.cognitive * r1.data[k] * (self.best_positions.data[k] - x);
                let social = coeffs.social * r2.data[k] * (social_best.data[k] - x);
                let v = coeffs.inertia * self.velocities.data[k] + cognitive + social;
                self.velocities.data[k] = v;
                self.positions.data[k] = x + v;
            }
            bounds.clip(self.positions.row_mut(i));
        }
    }

    /// Moves particle `i` to a fresh random point and stops it.
    /// Its personal best is left alone.
    pub fn respawn(&mut self, i: usize, bounds: &BoundsModel, rng: &mut Rng) {
        bounds.sample_into(rng, self.positions.row_mut(i));
        self.velocities.row_mut(i).fill(0.0);
    }

    pub fn mean_best_fitness(&self) -> f64 {
        self.best_fitness.iter().sum::<f64>() / self.len() as f64
    }

    /// Mean Euclidean distance of current positions from their centroid.
    pub fn diversity(&self) -> f64 {
        let n = self.len() as f64;
        let dims = self.dimensions();
        let mut centroid = vec![0.0; dims];
        for row in self.positions.iter_rows() {
            for (c, x) in centroid.iter_mut().zip(row) {
                *c += x;
            }
        }
        centroid.iter_mut().for_each(|c| *c /= n);

        self.positions
            .iter_rows()
            .map(|row| {
                row.iter()
                    .zip(&centroid)
                    .map(|(x, c)| (x - c) * (x - c))
                    .sum::<f64>()
                    .sqrt()
            })
            .sum::<f64>()
            / n
    }
}

/// Index of the smallest value; first occurrence wins ties.
pub fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    best
}

/// Single batched call, with the shape and finiteness of the answer checked.
pub(crate) fn evaluate_checked<F>(objective: &F, positions: &SwarmMatrix) -> SwarmResult<Vec<f64>>
where
    F: ObjectiveFunction + ?Sized,
{
    let fitness = objective.evaluate(positions)?;
    if fitness.len() != positions.rows() {
        return Err(SwarmError::FitnessShape {
            expected: positions.rows(),
            actual: fitness.len(),
        });
    }
    if let Some((index, &value)) = fitness.iter().enumerate().find(|(_, f)| !f.is_finite()) {
        return Err(SwarmError::NonFiniteFitness { index, value });
    }
    Ok(fitness)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(positions: Vec<Vec<f64>>, fitness: Vec<f64>) -> SwarmState {
        let positions = SwarmMatrix::from_rows(positions).unwrap();
        let velocities = SwarmMatrix::zeros(positions.rows(), positions.cols());
        SwarmState::from_parts(positions, velocities, fitness).unwrap()
    }

    #[test]
    fn test_argmin_prefers_first_tie() {
        assert_eq!(argmin(&[3.0, 1.0, 1.0, 2.0]), 1);
        assert_eq!(argmin(&[5.0]), 0);
    }

    #[test]
    fn test_personal_best_ignores_ties() {
        let mut s = state_with(vec![vec![0.0], vec![1.0]], vec![2.0, 2.0]);
        s.positions.row_mut(0)[0] = 9.0;
        s.positions.row_mut(1)[0] = 8.0;

        let improved = s.update_personal_bests(&[2.0, 1.5]);

        assert_eq!(improved, 1);
        assert_eq!(s.best_positions.row(0), &[0.0]);
        assert_eq!(s.best_positions.row(1), &[8.0]);
        assert_eq!(s.best_fitness, vec![2.0, 1.5]);
    }

    #[test]
    fn test_global_best_needs_strict_improvement() {
        let mut s = state_with(vec![vec![0.0], vec![1.0]], vec![1.0, 3.0]);
        s.best_fitness[1] = 1.0;
        assert!(!s.update_global_best());
        assert_eq!(s.global_best.source_index, 0);

        s.best_fitness[1] = 0.5;
        assert!(s.update_global_best());
        assert_eq!(s.global_best.source_index, 1);
        assert_eq!(s.global_best.position, vec![1.0]);
    }

    #[test]
    fn test_diversity_of_symmetric_cloud() {
        let s = state_with(
            vec![vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, 1.0], vec![0.0, -1.0]],
            vec![0.0; 4],
        );
        assert!((s.diversity() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_fitness_is_rejected() {
        let positions = SwarmMatrix::zeros(2, 1);
        let objective =
            |_: &SwarmMatrix| -> SwarmResult<Vec<f64>> { Ok(vec![1.0, f64::NAN]) };
        let err = evaluate_checked(&objective, &positions).unwrap_err();
        assert!(matches!(err, SwarmError::NonFiniteFitness { index: 1, .. }));
    }
}
