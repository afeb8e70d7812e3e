//! Core traits shared by the consensus engines.
//!
//! - [`Estimator`]: a parametric two-view model together with the
//!   correspondences it is fitted to.
//! - [`Sampler`]: draws minimal samples from a pool of candidate indices.
//! - [`RansacTerminationCriterion`]: the adaptive iteration bound.

use crate::error::EstimationError;
use crate::types::{ImageSize, Residual, ResidualKind, Side};

/// Parametric model estimator owning its correspondences.
///
/// Models are expressed in pixel coordinates; any conditioning of the
/// solver happens inside [`Estimator::fit`].
pub trait Estimator {
    /// Model type produced by this estimator.
    type Model: Clone;

    /// Number of correspondences of a minimal sample.
    fn sample_size(&self) -> usize;

    /// Maximum number of models a minimal sample can yield.
    fn max_models(&self) -> usize;

    /// Whether residuals are point-to-point or point-to-line distances.
    fn residual_kind(&self) -> ResidualKind;

    /// Number of correspondences.
    fn num_data(&self) -> usize;

    /// Dimensions of the first or second image.
    fn image_size(&self, side: Side) -> ImageSize;

    /// Models compatible with the indexed correspondences.
    ///
    /// With exactly [`Estimator::sample_size`] indices this is the minimal
    /// solver; with more it is a least-squares fit. An empty result means the
    /// configuration is degenerate.
    fn fit(&self, indices: &[usize]) -> Vec<Self::Model>;

    /// Squared pixel error of correspondence `index` under `model`, measured
    /// in the second image.
    fn error(&self, model: &Self::Model, index: usize) -> f64;

    /// Squared error together with the image where it is measured.
    ///
    /// Models with a natural dual (inverse homography, transposed fundamental
    /// matrix) report the larger of both directions.
    fn sided_error(&self, model: &Self::Model, index: usize) -> Residual {
        Residual::new(self.error(model, index), Side::Second)
    }

    /// Single model from the indexed correspondences.
    ///
    /// When the solver returns several candidates, the one with the least
    /// total error over `indices` is kept.
    fn compute_model(&self, indices: &[usize]) -> Result<Self::Model, EstimationError> {
        let total_error =
            |m: &Self::Model| -> f64 { indices.iter().map(|&i| self.error(m, i)).sum() };

        self.fit(indices)
            .into_iter()
            .map(|m| (total_error(&m), m))
            .filter(|(e, _)| !e.is_nan())
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, m)| m)
            .ok_or(EstimationError::DegenerateSample)
    }
}

/// Sampler responsible for drawing minimal samples.
pub trait Sampler {
    /// Fill `out_indices` with distinct entries of `pool`.
    ///
    /// Returns `false` if the pool is too small.
    fn sample(&mut self, pool: &[usize], out_indices: &mut [usize]) -> bool;
}

/// RANSAC-style bound on the number of iterations given the current best
/// inlier ratio and desired confidence.
///
/// The update rule follows the standard formula
/// `N = log(1 - confidence) / log(1 - inlier_ratio^sample_size)`.
#[derive(Debug, Clone, Copy)]
pub struct RansacTerminationCriterion {
    /// Desired confidence in \[0, 1).
    pub confidence: f64,
}

impl RansacTerminationCriterion {
    pub fn new(confidence: f64) -> Self {
        Self { confidence }
    }

    /// Iterations required to draw one all-inlier sample with the configured
    /// confidence, clamped to `max_iterations`.
    pub fn required_iterations(
        &self,
        inlier_count: usize,
        data_count: usize,
        sample_size: usize,
        max_iterations: usize,
    ) -> usize {
        if data_count == 0 || inlier_count == 0 {
            return max_iterations;
        }
        let inlier_ratio = (inlier_count as f64 / data_count as f64).min(1.0);
        if inlier_ratio >= 1.0 {
            return max_iterations.min(1);
        }

        let p_good_sample = inlier_ratio.powi(sample_size as i32);
        let log_one_minus_conf = (1.0 - self.confidence).ln();
        let log_one_minus_p = (1.0 - p_good_sample).ln();
        if !log_one_minus_conf.is_finite() || log_one_minus_p >= 0.0 {
            return max_iterations;
        }

        let required = (log_one_minus_conf / log_one_minus_p).ceil();
        if !required.is_finite() || required >= max_iterations as f64 {
            max_iterations
        } else {
            (required as usize).max(1)
        }
    }

    /// Shrink `max_iterations` in place; never grows it.
    pub fn update(
        &self,
        inlier_count: usize,
        data_count: usize,
        sample_size: usize,
        max_iterations: &mut usize,
    ) {
        *max_iterations =
            self.required_iterations(inlier_count, data_count, sample_size, *max_iterations);
    }
}
