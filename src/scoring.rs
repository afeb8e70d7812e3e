//! Scoring of candidate models.
//!
//! - [`InlierCountScoring`]: classical RANSAC score, the number of
//!   correspondences within a fixed threshold.
//! - [`NfaScoring`]: a-contrario score, the best `log10(NFA)` over every
//!   inlier-count cutoff of the sorted residuals.

use crate::core::Estimator;
use crate::types::{Residual, Side};

/// Counts correspondences whose squared error is within a fixed threshold.
#[derive(Debug, Clone, Copy)]
pub struct InlierCountScoring {
    threshold_sq: f64,
}

impl InlierCountScoring {
    /// `threshold` is a pixel distance.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold_sq: threshold * threshold,
        }
    }

    /// Fill `inliers_out` with the correspondences within the threshold, in
    /// increasing index order, and return their count.
    pub fn score<E: Estimator>(
        &self,
        estimator: &E,
        model: &E::Model,
        inliers_out: &mut Vec<usize>,
    ) -> usize {
        inliers_out.clear();
        inliers_out.extend(
            (0..estimator.num_data()).filter(|&i| estimator.error(model, i) <= self.threshold_sq),
        );
        inliers_out.len()
    }
}

/// Best cutoff found by [`NfaScoring::score`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NfaScore {
    /// Minimum `log10(NFA)` over the cutoffs; infinite when none was admissible.
    pub log_nfa: f64,
    /// Number of correspondences below the cutoff.
    pub inlier_count: usize,
    /// Squared pixel error of the last correspondence kept.
    pub error_sq: f64,
    /// Image where that error is measured.
    pub side: Side,
}

impl NfaScore {
    /// Score of a model no cutoff could be evaluated for.
    pub fn worst() -> Self {
        Self {
            log_nfa: f64::INFINITY,
            inlier_count: 0,
            error_sq: f64::INFINITY,
            side: Side::Second,
        }
    }

    /// `NFA < 1`.
    pub fn is_meaningful(&self) -> bool {
        self.log_nfa < 0.0
    }
}

/// Number of false alarms of a model, minimized over inlier-count cutoffs.
///
/// For the `k` smallest residuals with the `k`-th equal to `e` (squared
/// pixels) measured in image `j`:
///
/// `log10 NFA = log10(m (n - s)) + log10 C(n, k) + log10 C(k, s) + (k - s) log10(alpha0_j e^d)`
///
/// with `m` the models per sample, `s` the sample size and `d` the error
/// exponent of the residual kind.
#[derive(Debug, Clone)]
pub struct NfaScoring {
    sample_size: usize,
    log_tests: f64,
    log_alpha0: [f64; 2],
    exponent: f64,
    max_error_sq: f64,
    log_c_n: Vec<f64>,
    log_c_k: Vec<f64>,
}

impl NfaScoring {
    /// Tables for the estimator's data; residuals above `max_error_sq` are
    /// never counted as inliers.
    pub fn new<E: Estimator>(estimator: &E, max_error_sq: f64) -> Self {
        let n = estimator.num_data();
        let s = estimator.sample_size();
        let kind = estimator.residual_kind();
        let log_alpha0 = [Side::First, Side::Second]
            .map(|side| kind.alpha0(&estimator.image_size(side)).log10());

        Self {
            sample_size: s,
            log_tests: ((estimator.max_models() * n.saturating_sub(s)) as f64).log10(),
            log_alpha0,
            exponent: kind.error_exponent(),
            max_error_sq,
            log_c_n: crate::utils::log_combinations_n(n),
            log_c_k: crate::utils::log_combinations_k(s, n),
        }
    }

    /// Compute the sorted residuals of `model` into `residuals` and return the
    /// best cutoff.
    pub fn score<E: Estimator>(
        &self,
        estimator: &E,
        model: &E::Model,
        residuals: &mut Vec<(Residual, usize)>,
    ) -> NfaScore {
        residuals.clear();
        residuals.extend((0..estimator.num_data()).map(|i| (estimator.sided_error(model, i), i)));
        residuals.sort_by(|a, b| a.0.error.total_cmp(&b.0.error));
        self.best_cutoff(residuals)
    }

    /// Sweep cutoffs `k = s+1..=n` over residuals sorted by increasing error.
    pub fn best_cutoff(&self, sorted: &[(Residual, usize)]) -> NfaScore {
        let s = self.sample_size;
        let mut best = NfaScore::worst();

        for k in (s + 1)..=sorted.len() {
            let residual = sorted[k - 1].0;
            if !(residual.error <= self.max_error_sq) {
                break;
            }
            let log_alpha = self.log_alpha0[residual.side.index()]
                + self.exponent * (residual.error + f32::EPSILON as f64).log10();
            let log_nfa = self.log_tests
                + self.log_c_n[k]
                + self.log_c_k[k]
                + (k - s) as f64 * log_alpha;
            if log_nfa < best.log_nfa {
                best = NfaScore {
                    log_nfa,
                    inlier_count: k,
                    error_sq: residual.error,
                    side: residual.side,
                };
            }
        }
        best
    }
}

/// Indices of the first `count` sorted residuals, in increasing index order.
pub fn leading_indices(sorted: &[(Residual, usize)], count: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = sorted.iter().take(count).map(|&(_, i)| i).collect();
    indices.sort_unstable();
    indices
}
