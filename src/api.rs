//! High-level estimation API.
//!
//! Two entry points, one per consensus engine, generic over any
//! [`Estimator`]; each runs the engine and then refines the result over all
//! its inliers. Convenience wrappers cover the fundamental matrix and the
//! homography.

use rand::Rng;

use crate::core::Estimator;
use crate::error::EstimationError;
use crate::estimators::{FundamentalEstimator, HomographyEstimator};
use crate::models::{FundamentalMatrix, Homography};
use crate::acontrario::Orsa;
use crate::ransac::Ransac;
use crate::refine::{error_stats, refine, ErrorStats, Refinement};
use crate::report::Reporter;
use crate::samplers::UniformRandomSampler;
use crate::settings::{OrsaSettings, RansacSettings};
use crate::types::{Correspondence, ImageSize};

/// Result of a robust estimation.
#[derive(Debug, Clone)]
pub struct Estimate<M> {
    /// The estimated model, refined when refinement was accepted.
    ///
    /// `None` only after a RANSAC run in which no sample produced a model.
    pub model: Option<M>,
    /// Indices of the inliers, increasing.
    pub inliers: Vec<usize>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Inlier threshold in pixels: the caller's for RANSAC, the discovered one for ORSA.
    pub precision: f64,
    /// Best `log10(NFA)`; only set by the a-contrario estimation.
    pub log_nfa: Option<f64>,
    /// Outcome of the refinement step with the error statistics.
    pub refinement: Refinement,
}

/// RANSAC with a fixed inlier threshold (pixels), followed by refinement.
///
/// Fails with [`EstimationError::InsufficientData`] iff there are fewer
/// correspondences than a minimal sample. A run where no sample produced a
/// model still succeeds, with no model, no inliers and a
/// [`Refinement::Failed`] outcome.
pub fn estimate_with_fixed_threshold<E, R>(
    estimator: &E,
    threshold: f64,
    settings: &RansacSettings,
    rng: &mut R,
    reporter: &dyn Reporter,
) -> Result<Estimate<E::Model>, EstimationError>
where
    E: Estimator,
    R: Rng + ?Sized,
{
    settings.validate()?;
    if !(threshold >= 0.0 && threshold.is_finite()) {
        return Err(EstimationError::InvalidSettings(format!(
            "threshold must be a non-negative distance, got {}",
            threshold
        )));
    }

    let n = estimator.num_data();
    let s = estimator.sample_size();
    if n < s {
        reporter.error(format_args!("RANSAC needs {} matches or more to proceed", s));
        return Err(EstimationError::InsufficientData {
            method: "RANSAC",
            required: s,
            actual: n,
        });
    }

    let mut ransac = Ransac::new(
        settings.clone(),
        estimator,
        UniformRandomSampler::new(rng),
        threshold,
    );
    let iterations = ransac.run();
    reporter.info(format_args!("Iterations: {}", iterations));

    let inliers = std::mem::take(&mut ransac.best_inliers);
    let mut model = ransac.best_model.take();
    let refinement = match model.as_mut() {
        Some(model) => finish(estimator, &inliers, model, settings.refine, reporter),
        None => {
            reporter.warning(format_args!(
                "No sample produced a model in {} iterations, result is empty",
                iterations
            ));
            Refinement::Failed {
                before: ErrorStats::default(),
            }
        }
    };
    Ok(Estimate {
        model,
        inliers,
        iterations,
        precision: threshold,
        log_nfa: None,
        refinement,
    })
}

/// A-contrario RANSAC (ORSA), followed by refinement.
///
/// Needs more correspondences than a minimal sample. When no model reaches
/// `log10(NFA) < 0` the result is [`EstimationError::NotMeaningful`], which
/// is a negative answer rather than a failure.
pub fn estimate_with_auto_threshold<E, R>(
    estimator: &E,
    settings: &OrsaSettings,
    rng: &mut R,
    reporter: &dyn Reporter,
) -> Result<Estimate<E::Model>, EstimationError>
where
    E: Estimator,
    R: Rng + ?Sized,
{
    settings.validate()?;

    let n = estimator.num_data();
    let s = estimator.sample_size();
    if n <= s {
        reporter.error(format_args!("ORSA needs {} matches or more to proceed", s + 1));
        return Err(EstimationError::InsufficientData {
            method: "ORSA",
            required: s + 1,
            actual: n,
        });
    }

    let mut orsa = Orsa::new(
        settings.clone(),
        estimator,
        UniformRandomSampler::new(rng),
        reporter,
    );
    let log_nfa = orsa.run();
    let iterations = orsa.iteration;
    reporter.info(format_args!("Iterations: {}", iterations));

    let (Some(mut model), Some(precision)) = (orsa.best_model.take(), orsa.precision) else {
        reporter.warning(format_args!(
            "No meaningful model found (log10 NFA = {})",
            log_nfa
        ));
        return Err(EstimationError::NotMeaningful {
            log_nfa,
            iterations,
        });
    };
    reporter.info(format_args!(
        "log10 NFA = {}, precision = {} px, {} inliers",
        log_nfa,
        precision,
        orsa.best_inliers.len()
    ));

    let inliers = std::mem::take(&mut orsa.best_inliers);
    let refinement = finish(estimator, &inliers, &mut model, settings.refine, reporter);
    Ok(Estimate {
        model: Some(model),
        inliers,
        iterations,
        precision,
        log_nfa: Some(log_nfa),
        refinement,
    })
}

fn finish<E: Estimator>(
    estimator: &E,
    inliers: &[usize],
    model: &mut E::Model,
    enabled: bool,
    reporter: &dyn Reporter,
) -> Refinement {
    if enabled {
        refine(estimator, inliers, model, reporter)
    } else {
        let before = error_stats(estimator, model, inliers);
        reporter.info(format_args!(
            "Average/max error: {}/{}",
            before.rms, before.max
        ));
        Refinement::Skipped { before }
    }
}

/// Estimate a fundamental matrix with a fixed threshold (pixels).
///
/// # Arguments
/// * `matches` - Point correspondences between the two images
/// * `size1`, `size2` - Dimensions of the first and second image
/// * `threshold` - Inlier threshold in pixels
/// * `settings_opt` - Optional RANSAC settings (uses defaults if None)
/// * `rng` - Random source driving the sampling
/// * `reporter` - Destination of the diagnostics
pub fn estimate_fundamental_matrix<R: Rng + ?Sized>(
    matches: &[Correspondence],
    size1: ImageSize,
    size2: ImageSize,
    threshold: f64,
    settings_opt: Option<RansacSettings>,
    rng: &mut R,
    reporter: &dyn Reporter,
) -> Result<Estimate<FundamentalMatrix>, EstimationError> {
    let estimator = FundamentalEstimator::new(matches, size1, size2)?;
    let settings = settings_opt.unwrap_or_default();
    estimate_with_fixed_threshold(&estimator, threshold, &settings, rng, reporter)
}

/// Estimate a fundamental matrix with ORSA, discovering the threshold.
pub fn estimate_fundamental_matrix_auto<R: Rng + ?Sized>(
    matches: &[Correspondence],
    size1: ImageSize,
    size2: ImageSize,
    settings_opt: Option<OrsaSettings>,
    rng: &mut R,
    reporter: &dyn Reporter,
) -> Result<Estimate<FundamentalMatrix>, EstimationError> {
    let estimator = FundamentalEstimator::new(matches, size1, size2)?;
    let settings = settings_opt.unwrap_or_default();
    estimate_with_auto_threshold(&estimator, &settings, rng, reporter)
}

/// Estimate a homography with a fixed threshold (pixels).
pub fn estimate_homography<R: Rng + ?Sized>(
    matches: &[Correspondence],
    size1: ImageSize,
    size2: ImageSize,
    threshold: f64,
    settings_opt: Option<RansacSettings>,
    rng: &mut R,
    reporter: &dyn Reporter,
) -> Result<Estimate<Homography>, EstimationError> {
    let estimator = HomographyEstimator::new(matches, size1, size2)?;
    let settings = settings_opt.unwrap_or_default();
    estimate_with_fixed_threshold(&estimator, threshold, &settings, rng, reporter)
}

/// Estimate a homography with ORSA, discovering the threshold.
pub fn estimate_homography_auto<R: Rng + ?Sized>(
    matches: &[Correspondence],
    size1: ImageSize,
    size2: ImageSize,
    settings_opt: Option<OrsaSettings>,
    rng: &mut R,
    reporter: &dyn Reporter,
) -> Result<Estimate<Homography>, EstimationError> {
    let estimator = HomographyEstimator::new(matches, size1, size2)?;
    let settings = settings_opt.unwrap_or_default();
    estimate_with_auto_threshold(&estimator, &settings, rng, reporter)
}
