use crate::error::{SwarmError, SwarmResult};
use fastrand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive per-dimension search box.
///
/// Every position the optimizer produces lies inside this box. The box is
/// validated once, on construction; `sample` and `clip` never fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsModel {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl BoundsModel {
    pub fn new(ranges: &[(f64, f64)]) -> SwarmResult<Self> {
        if ranges.is_empty() {
            return Err(SwarmError::config("bounds must cover at least one dimension"));
        }

        for (i, &(lo, hi)) in ranges.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(SwarmError::config(format!(
                    "bounds for dimension {} are not finite ({}, {})",
                    i, lo, hi
                )));
            }
            if lo > hi {
                return Err(SwarmError::config(format!(
                    "bounds for dimension {} are inverted: min {} > max {}",
                    i, lo, hi
                )));
            }
            if !(hi - lo).is_finite() {
                return Err(SwarmError::config(format!(
                    "bounds for dimension {} are too wide: {} - {} overflows",
                    i, hi, lo
                )));
            }
        }

        Ok(Self {
            min: ranges.iter().map(|r| r.0).collect(),
            max: ranges.iter().map(|r| r.1).collect(),
        })
    }

    /// Same range repeated over `dimensions` axes.
    pub fn uniform(dimensions: usize, min: f64, max: f64) -> SwarmResult<Self> {
        Self::new(&vec![(min, max); dimensions])
    }

    /// Parses `"min:max,min:max,..."`, one pair per dimension.
    pub fn parse(text: &str) -> SwarmResult<Self> {
        let mut ranges = Vec::new();
        for part in text.split(',') {
            let part = part.trim();
            let (lo, hi) = part.split_once(':').ok_or_else(|| {
                SwarmError::config(format!("bound '{}' is not of the form min:max", part))
            })?;
            let lo: f64 = lo
                .trim()
                .parse()
                .map_err(|_| SwarmError::config(format!("invalid lower bound in '{}'", part)))?;
            let hi: f64 = hi
                .trim()
                .parse()
                .map_err(|_| SwarmError::config(format!("invalid upper bound in '{}'", part)))?;
            ranges.push((lo, hi));
        }
        Self::new(&ranges)
    }

    pub fn dimensions(&self) -> usize {
        self.min.len()
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn max(&self) -> &[f64] {
        &self.max
    }

    #[inline]
    pub fn span(&self, dim: usize) -> f64 {
        self.max[dim] - self.min[dim]
    }

    pub fn ranges(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.min.iter().copied().zip(self.max.iter().copied())
    }

    /// Uniform random point inside the box.
    pub fn sample(&self, rng: &mut Rng) -> Vec<f64> {
        let mut point = vec![0.0; self.dimensions()];
        self.sample_into(rng, &mut point);
        point
    }

    pub fn sample_into(&self, rng: &mut Rng, out: &mut [f64]) {
        for (d, x) in out.iter_mut().enumerate() {
            // rounding can push lo + r * span one ulp past hi
            *x = (self.min[d] + rng.f64() * self.span(d)).min(self.max[d]);
        }
    }

    /// Component-wise clamp into the box, in place.
    #[inline]
    pub fn clip(&self, point: &mut [f64]) {
        for (d, x) in point.iter_mut().enumerate() {
            *x = x.clamp(self.min[d], self.max[d]);
        }
    }

    pub fn clipped(&self, point: &[f64]) -> Vec<f64> {
        let mut out = point.to_vec();
        self.clip(&mut out);
        out
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dimensions()
            && point
                .iter()
                .zip(self.ranges())
                .all(|(&x, (lo, hi))| lo <= x && x <= hi)
    }
}

impl std::fmt::Display for BoundsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.ranges().map(|(lo, hi)| format!("{}:{}", lo, hi)).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = BoundsModel::new(&[(0.0, 1.0), (5.0, -5.0)]).unwrap_err();
        assert!(err.to_string().contains("dimension 1"));
    }

    #[test]
    fn test_degenerate_dimension_allowed() {
        let bounds = BoundsModel::new(&[(2.0, 2.0)]).unwrap();
        let mut rng = Rng::with_seed(7);
        assert_eq!(bounds.sample(&mut rng), vec![2.0]);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let bounds = BoundsModel::parse("-10:10, 0:5.5").unwrap();
        assert_eq!(bounds.to_string(), "-10:10,0:5.5");
        assert_eq!(BoundsModel::parse(&bounds.to_string()).unwrap(), bounds);
    }

    proptest! {
        #[test]
        fn prop_clip_is_idempotent_and_contained(
            lo in -100.0..0.0f64,
            width in 0.0..50.0f64,
            point in proptest::collection::vec(-500.0..500.0f64, 3)
        ) {
            let bounds = BoundsModel::uniform(3, lo, lo + width).unwrap();
            let once = bounds.clipped(&point);
            let twice = bounds.clipped(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert!(bounds.contains(&once));
        }

        #[test]
        fn prop_samples_stay_inside(seed in any::<u64>()) {
            let bounds = BoundsModel::new(&[(-1.0, 1.0), (10.0, 20.0), (0.0, 1e-3)]).unwrap();
            let mut rng = Rng::with_seed(seed);
            for _ in 0..20 {
                prop_assert!(bounds.contains(&bounds.sample(&mut rng)));
            }
        }
    }
}
