//! A-contrario RANSAC (ORSA).
//!
//! No inlier threshold is given in advance. Every candidate model is scored
//! by the number of false alarms ([`NfaScoring`]) of its best inlier cutoff,
//! and the model is meaningful when that number is below 1. The threshold
//! attaining the minimum is reported back as the precision of the result.
//!
//! A fraction of the iteration budget is held in reserve. Once a meaningful
//! model is known, the reserve is spent drawing samples among its inliers; if
//! the main budget runs out first, the reserve is spent among the best
//! inliers found so far.

use crate::core::{Estimator, RansacTerminationCriterion, Sampler};
use crate::report::Reporter;
use crate::scoring::{leading_indices, NfaScore, NfaScoring};
use crate::settings::OrsaSettings;
use crate::types::Side;

pub struct Orsa<'a, E, Sa>
where
    E: Estimator,
    Sa: Sampler,
{
    pub settings: OrsaSettings,
    pub estimator: &'a E,
    pub sampler: Sa,
    pub scoring: NfaScoring,
    reporter: &'a dyn Reporter,

    // Outputs / diagnostics
    pub best_model: Option<E::Model>,
    pub best_inliers: Vec<usize>,
    pub best_score: NfaScore,
    /// Inlier threshold in pixels, set when the result is meaningful.
    pub precision: Option<f64>,
    pub iteration: usize,
}

impl<'a, E, Sa> Orsa<'a, E, Sa>
where
    E: Estimator,
    Sa: Sampler,
{
    pub fn new(
        settings: OrsaSettings,
        estimator: &'a E,
        sampler: Sa,
        reporter: &'a dyn Reporter,
    ) -> Self {
        let scoring = NfaScoring::new(estimator, settings.max_squared_error());
        Self {
            settings,
            estimator,
            sampler,
            scoring,
            reporter,
            best_model: None,
            best_inliers: Vec::new(),
            best_score: NfaScore::worst(),
            precision: None,
            iteration: 0,
        }
    }

    /// Run the search; returns the best `log10(NFA)`.
    ///
    /// A non-negative value means no meaningful model was found, in which
    /// case `best_inliers` is left empty and `precision` unset.
    pub fn run(&mut self) -> f64 {
        let n = self.estimator.num_data();
        let sample_size = self.estimator.sample_size();
        let mut sample = vec![0usize; sample_size];
        let mut residuals = Vec::new();
        let mut pool: Vec<usize> = (0..n).collect();

        let termination = RansacTerminationCriterion::new(self.settings.confidence);
        let budget = self.settings.max_iterations.max(1);
        let mut reserve = (budget as f64 * self.settings.reserve_ratio) as usize;
        reserve = reserve.min(budget - 1);
        let mut n_iter = budget - reserve;

        self.best_model = None;
        self.best_inliers.clear();
        self.best_score = NfaScore::worst();
        self.precision = None;
        self.iteration = 0;

        while self.iteration < n_iter {
            if self.sampler.sample(&pool, &mut sample) {
                for model in self.estimator.fit(&sample) {
                    let score = self.scoring.score(self.estimator, &model, &mut residuals);
                    if score.log_nfa >= self.best_score.log_nfa {
                        continue;
                    }

                    self.best_score = score;
                    self.best_model = Some(model);
                    self.best_inliers = leading_indices(&residuals, score.inlier_count);
                    if self.settings.verbose {
                        self.report_improvement(&score);
                    }

                    if score.is_meaningful() {
                        pool.clone_from(&self.best_inliers);
                        if reserve > 0 {
                            n_iter = self.iteration + 1 + reserve;
                            reserve = 0;
                        }
                        let required = termination.required_iterations(
                            score.inlier_count,
                            n,
                            sample_size,
                            n_iter,
                        );
                        n_iter = n_iter.min(required.max(self.iteration + 1));
                    }
                }
            }

            if self.iteration + 1 == n_iter && reserve > 0 {
                if self.best_model.is_none() {
                    n_iter += 1;
                    reserve -= 1;
                } else {
                    pool.clone_from(&self.best_inliers);
                    n_iter += reserve;
                    reserve = 0;
                }
            }
            self.iteration += 1;
        }

        if self.best_score.is_meaningful() {
            self.precision = Some(self.best_score.error_sq.sqrt());
        } else {
            self.best_inliers.clear();
        }
        self.best_score.log_nfa
    }

    fn report_improvement(&self, score: &NfaScore) {
        let image = match score.side {
            Side::First => 1,
            Side::Second => 2,
        };
        self.reporter.info(format_args!(
            "  nfa={} inliers={} precision={} im{} (iter={})",
            score.log_nfa,
            score.inlier_count,
            score.error_sq.sqrt(),
            image,
            self.iteration
        ));
    }
}
