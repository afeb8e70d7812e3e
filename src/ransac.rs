//! Fixed-threshold RANSAC.

use crate::core::{Estimator, RansacTerminationCriterion, Sampler};
use crate::scoring::InlierCountScoring;
use crate::settings::RansacSettings;

/// Classical sampling consensus with a caller-supplied inlier threshold.
///
/// Every iteration draws a minimal sample, fits up to
/// [`Estimator::max_models`] candidates and keeps the one with the most
/// inliers (first found on ties). Each improvement shrinks the iteration
/// budget with [`RansacTerminationCriterion`].
pub struct Ransac<'a, E, Sa>
where
    E: Estimator,
    Sa: Sampler,
{
    pub settings: RansacSettings,
    pub estimator: &'a E,
    pub sampler: Sa,
    pub scoring: InlierCountScoring,

    // Outputs / diagnostics
    pub best_model: Option<E::Model>,
    pub best_inliers: Vec<usize>,
    pub iteration: usize,
}

impl<'a, E, Sa> Ransac<'a, E, Sa>
where
    E: Estimator,
    Sa: Sampler,
{
    /// `threshold` is the inlier distance in pixels.
    pub fn new(settings: RansacSettings, estimator: &'a E, sampler: Sa, threshold: f64) -> Self {
        Self {
            settings,
            estimator,
            sampler,
            scoring: InlierCountScoring::new(threshold),
            best_model: None,
            best_inliers: Vec::new(),
            iteration: 0,
        }
    }

    /// Run the consensus loop; returns the number of iterations executed.
    ///
    /// Iterations whose sample yields no model still count toward the budget.
    pub fn run(&mut self) -> usize {
        let n = self.estimator.num_data();
        let sample_size = self.estimator.sample_size();
        let pool: Vec<usize> = (0..n).collect();
        let mut sample = vec![0usize; sample_size];
        let mut inliers = Vec::new();

        let termination = RansacTerminationCriterion::new(self.settings.confidence);
        let mut max_iterations = self.settings.max_iterations.max(1);

        self.best_model = None;
        self.best_inliers.clear();
        self.iteration = 0;

        while self.iteration < max_iterations {
            self.iteration += 1;

            if !self.sampler.sample(&pool, &mut sample) {
                continue;
            }

            for model in self.estimator.fit(&sample) {
                let count = self.scoring.score(self.estimator, &model, &mut inliers);
                if self.best_model.is_none() || count > self.best_inliers.len() {
                    self.best_model = Some(model);
                    std::mem::swap(&mut self.best_inliers, &mut inliers);
                    termination.update(count, n, sample_size, &mut max_iterations);
                }
            }
        }

        self.iteration
    }
}
