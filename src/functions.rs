use crate::bounds::BoundsModel;
use crate::error::SwarmResult;
use crate::objective::ObjectiveFunction;
use crate::optimizer::SwarmMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum_macros::{Display, EnumIter, EnumString};

/// Standard benchmark landscapes. All have their global minimum of 0 at the
/// origin, except Rosenbrock whose minimum sits at (1, ..., 1).
#[derive(
    Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum KnownFunction {
    Sphere,
    Rastrigin,
    Rosenbrock,
    Ackley,
    Griewank,
}

impl KnownFunction {
    /// Conventional search domain, applied to every dimension.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Sphere => (-10.0, 10.0),
            Self::Rastrigin => (-5.12, 5.12),
            Self::Rosenbrock => (-5.0, 10.0),
            Self::Ackley => (-32.768, 32.768),
            Self::Griewank => (-600.0, 600.0),
        }
    }

    pub fn default_bounds(&self, dimensions: usize) -> SwarmResult<BoundsModel> {
        let (lo, hi) = self.domain();
        BoundsModel::uniform(dimensions, lo, hi)
    }

    pub fn minimizer(&self, dimensions: usize) -> Vec<f64> {
        match self {
            Self::Rosenbrock => vec![1.0; dimensions],
            _ => vec![0.0; dimensions],
        }
    }

    pub fn value(&self, x: &[f64]) -> f64 {
        match self {
            Self::Sphere => x.iter().map(|v| v * v).sum(),
            Self::Rastrigin => {
                10.0 * x.len() as f64
                    + x.iter()
                        .map(|v| v * v - 10.0 * (2.0 * PI * v).cos())
                        .sum::<f64>()
            }
            Self::Rosenbrock => x
                .windows(2)
                .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
                .sum(),
            Self::Ackley => {
                let n = x.len() as f64;
                let sq = x.iter().map(|v| v * v).sum::<f64>() / n;
                let cos = x.iter().map(|v| (2.0 * PI * v).cos()).sum::<f64>() / n;
                -20.0 * (-0.2 * sq.sqrt()).exp() - cos.exp() + 20.0 + std::f64::consts::E
            }
            Self::Griewank => {
                let sum = x.iter().map(|v| v * v).sum::<f64>() / 4000.0;
                let prod = x
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (v / ((i + 1) as f64).sqrt()).cos())
                    .product::<f64>();
                sum - prod + 1.0
            }
        }
    }
}

impl ObjectiveFunction for KnownFunction {
    fn evaluate(&self, positions: &SwarmMatrix) -> SwarmResult<Vec<f64>> {
        Ok(positions.iter_rows().map(|row| self.value(row)).collect())
    }
}
