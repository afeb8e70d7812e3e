//! Least-squares refinement of a consensus result over all its inliers.

use crate::core::Estimator;
use crate::report::Reporter;

/// Root-mean-square and maximum pixel error over a set of inliers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ErrorStats {
    pub rms: f64,
    pub max: f64,
}

/// RMS and maximum of the square-rooted [`Estimator::error`] over `inliers`.
///
/// An empty inlier set has zero error.
pub fn error_stats<E: Estimator>(
    estimator: &E,
    model: &E::Model,
    inliers: &[usize],
) -> ErrorStats {
    if inliers.is_empty() {
        return ErrorStats::default();
    }
    let (sum, max) = inliers
        .iter()
        .map(|&i| estimator.error(model, i))
        .fold((0.0, 0.0f64), |(sum, max), e| (sum + e, max.max(e)));
    ErrorStats {
        rms: (sum / inliers.len() as f64).sqrt(),
        max: max.sqrt(),
    }
}

/// What happened to the model during refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Refinement {
    /// Refinement disabled; the statistics are those of the consensus model.
    Skipped { before: ErrorStats },
    /// The refit model replaced the consensus model.
    Accepted { before: ErrorStats, after: ErrorStats },
    /// The refit model was worse than the worst consensus inlier and was dropped.
    Rejected { before: ErrorStats, after: ErrorStats },
    /// No model could be fitted, to the inliers or to any sample.
    Failed { before: ErrorStats },
}

impl Refinement {
    /// Statistics of the consensus model.
    pub fn before(&self) -> ErrorStats {
        match *self {
            Refinement::Skipped { before }
            | Refinement::Accepted { before, .. }
            | Refinement::Rejected { before, .. }
            | Refinement::Failed { before } => before,
        }
    }

    /// Statistics of the returned model.
    pub fn final_stats(&self) -> ErrorStats {
        match *self {
            Refinement::Accepted { after, .. } => after,
            _ => self.before(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Refinement::Accepted { .. })
    }
}

/// Refit `model` to all `inliers` and keep the result unless it regresses.
///
/// The refit is kept iff its RMS error does not exceed the maximum error of
/// the original model; otherwise, or if the fit fails, `model` is left
/// untouched and a warning is reported. The inlier set is never modified.
pub fn refine<E: Estimator>(
    estimator: &E,
    inliers: &[usize],
    model: &mut E::Model,
    reporter: &dyn Reporter,
) -> Refinement {
    let before = error_stats(estimator, model, inliers);
    reporter.info(format_args!(
        "Before refinement: average/max error: {}/{}",
        before.rms, before.max
    ));

    let refined = match estimator.compute_model(inliers) {
        Ok(refined) => refined,
        Err(err) => {
            reporter.warning(format_args!("Error in refinement ({}), result is suspect", err));
            return Refinement::Failed { before };
        }
    };

    let after = error_stats(estimator, &refined, inliers);
    reporter.info(format_args!(
        "After refinement: average/max error: {}/{}",
        after.rms, after.max
    ));

    if after.rms <= before.max {
        *model = refined;
        Refinement::Accepted { before, after }
    } else {
        reporter.warning(format_args!(
            "Error after refinement is too large ({} > {}), refinement ignored",
            after.rms, before.max
        ));
        Refinement::Rejected { before, after }
    }
}
