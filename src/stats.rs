//! Sampling estimators describing the point set held by a tree.
//!
//! All estimators draw their probes with a generator seeded from
//! [`Config::seed`](crate::Config), so repeated calls on the same tree agree.

use conv::ValueFrom;
use log::debug;
use rand::{rngs::StdRng, seq::index, SeedableRng};

use crate::{
    distance::Metric,
    error::{NearTreeError, Result},
    neartree::NearTree,
};

// Number of starting points for the farthest-of-farthest diameter search.
const DIAMETER_STARTS: usize = 5;
// The outer dimension radius is the diameter divided by this.
const DIMENSION_SCALE: f64 = 8.0;

fn to_f64(count: usize) -> f64 {
    f64::value_from(count).unwrap_or(f64::MAX)
}

impl<P, M: Metric<P>> NearTree<P, M> {
    /// Up to `sample_size` distinct points of the tree, and at least one.
    fn sample(&self) -> Vec<&P> {
        let points: Vec<&P> = self.iter().collect();
        let amount = self.config.sample_size.max(1).min(points.len());
        if amount == points.len() {
            return points;
        }
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        index::sample(&mut rng, points.len(), amount)
            .into_iter()
            .map(|i| points[i])
            .collect()
    }

    fn require_points(&self, required: usize) -> Result<()> {
        match self.len() {
            0 => Err(NearTreeError::EmptyStructure),
            found if found < required => Err(NearTreeError::TooFewPoints { required, found }),
            _ => Ok(()),
        }
    }

    /// Approximate the largest pairwise distance by taking the farthest
    /// point of the farthest point from a few sampled starts.
    ///
    /// The result never exceeds the true diameter and is at least half of it.
    pub fn estimate_diameter(&self) -> Result<f64> {
        self.require_points(1)?;
        let mut diameter: f64 = 0.0;
        for start in self.sample().into_iter().take(DIAMETER_STARTS) {
            let a = self.farthest(start)?;
            let b = self.farthest(a)?;
            diameter = diameter.max(self.metric.distance(a, b));
        }
        debug!("diameter estimate {diameter}");
        Ok(diameter)
    }

    /// Distance from each sampled point to its nearest other point.
    fn spacings(&self) -> Result<Vec<f64>> {
        self.require_points(2)?;
        self.sample()
            .into_iter()
            .map(|probe| -> Result<f64> {
                // One of the two is the probe itself.
                let (_, distances) = self.k_nearest(2, f64::INFINITY, probe)?;
                Ok(distances.into_iter().fold(0.0, f64::max))
            })
            .collect()
    }

    /// Mean nearest-neighbor spacing over the sampled points.
    pub fn estimate_mean_spacing(&self) -> Result<f64> {
        let spacings = self.spacings()?;
        Ok(mean(&spacings))
    }

    /// Sample variance of the nearest-neighbor spacing.
    pub fn estimate_spacing_variance(&self) -> Result<f64> {
        let spacings = self.spacings()?;
        if spacings.len() < 2 {
            return Ok(0.0);
        }
        let mean = mean(&spacings);
        let squares: f64 = spacings.iter().map(|s| (s - mean).powi(2)).sum();
        Ok(squares / to_f64(spacings.len() - 1))
    }

    /// Correlation-dimension estimate from how neighbor counts grow between
    /// two radii. This is a heuristic: edge effects and sparse data bias it.
    ///
    /// Returns `0.0` when every point coincides or when no point has a
    /// neighbor at the smaller radius.
    pub fn estimate_dimension(&self) -> Result<f64> {
        self.require_points(2)?;
        let diameter = self.estimate_diameter()?;
        if diameter <= 0.0 {
            return Ok(0.0);
        }
        let outer = diameter / DIMENSION_SCALE;
        let inner = outer / 2.0;

        let probes = self.sample();
        let mut inner_count = 0;
        let mut outer_count = 0;
        for probe in &probes {
            // Each probe finds itself.
            inner_count += self.count_in_sphere(inner, probe)?.saturating_sub(1);
            outer_count += self.count_in_sphere(outer, probe)?.saturating_sub(1);
        }
        if inner_count == 0 {
            return Ok(0.0);
        }

        let samples = to_f64(probes.len());
        let inner_mean = to_f64(inner_count) / samples;
        let outer_mean = to_f64(outer_count) / samples;
        let dimension = (outer_mean / inner_mean).ln() / (outer / inner).ln();
        debug!(
            "dimension estimate {dimension}: {inner_mean} neighbors at {inner}, {outer_mean} at {outer}"
        );
        Ok(dimension)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / to_f64(values.len())
}
