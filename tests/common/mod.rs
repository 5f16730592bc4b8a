#![allow(dead_code)]

use std::cell::Cell;
use swarmforge::error::SwarmResult;
use swarmforge::optimizer::{SwarmMatrix, SwarmState};
use swarmforge::{BoundsModel, ObjectiveFunction, OptimizationOptions};

pub fn sphere(positions: &SwarmMatrix) -> SwarmResult<Vec<f64>> {
    Ok(positions
        .iter_rows()
        .map(|row| row.iter().map(|x| x * x).sum())
        .collect())
}

/// Every candidate scores the same; the global best can never improve.
pub fn plateau(positions: &SwarmMatrix) -> SwarmResult<Vec<f64>> {
    Ok(vec![1.0; positions.rows()])
}

pub fn square_bounds(dims: usize, half_width: f64) -> BoundsModel {
    BoundsModel::uniform(dims, -half_width, half_width).unwrap()
}

pub fn sphere_options(dims: usize, particles: usize, iterations: usize) -> OptimizationOptions {
    OptimizationOptions::new(square_bounds(dims, 10.0))
        .with_particles(particles)
        .with_iterations(iterations)
}

/// State built from explicit rows, zero velocities, personal bests = positions.
pub fn state_from(positions: Vec<Vec<f64>>, fitness: Vec<f64>) -> SwarmState {
    let positions = SwarmMatrix::from_rows(positions).unwrap();
    let velocities = SwarmMatrix::zeros(positions.rows(), positions.cols());
    SwarmState::from_parts(positions, velocities, fitness).unwrap()
}

/// Wraps an objective and counts batched calls.
pub struct CountingObjective<F> {
    pub inner: F,
    pub calls: Cell<usize>,
    pub largest_batch: Cell<usize>,
}

impl<F> CountingObjective<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            largest_batch: Cell::new(0),
        }
    }
}

impl<F: ObjectiveFunction> ObjectiveFunction for CountingObjective<F> {
    fn evaluate(&self, positions: &SwarmMatrix) -> SwarmResult<Vec<f64>> {
        self.calls.set(self.calls.get() + 1);
        self.largest_batch
            .set(self.largest_batch.get().max(positions.rows()));
        self.inner.evaluate(positions)
    }
}
