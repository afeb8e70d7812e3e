//! # ORSA - Robust two-view estimation
//!
//! `orsa` estimates the geometric relation between two images, a fundamental
//! matrix or a homography, from point correspondences contaminated by
//! mismatches. Two consensus engines are provided:
//!
//! - **RANSAC** with a caller-supplied inlier threshold;
//! - **ORSA**, a-contrario RANSAC, which discovers the threshold by
//!   minimizing a number of false alarms and tells whether the result is
//!   statistically meaningful at all.
//!
//! Both are followed by a least-squares refinement over all inliers, kept only
//! when it does not make the fit worse.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orsa::{estimate_fundamental_matrix_auto, Correspondence, ImageSize, LogReporter};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let matches: Vec<Correspondence> = Vec::new(); // from a feature matcher
//! let size = ImageSize::new(1000, 800);
//! let mut rng = StdRng::seed_from_u64(0);
//!
//! match estimate_fundamental_matrix_auto(&matches, size, size, None, &mut rng, &LogReporter) {
//!     Ok(estimate) => println!(
//!         "{} inliers within {} px",
//!         estimate.inliers.len(),
//!         estimate.precision
//!     ),
//!     Err(err) if err.is_negative_result() => println!("no epipolar geometry"),
//!     Err(err) => eprintln!("estimation failed: {}", err),
//! }
//! ```
//!
//! ## Extending the Library
//!
//! Any model with a minimal solver can be plugged into both engines by
//! implementing [`Estimator`](core::Estimator) and calling
//! [`estimate_with_fixed_threshold`] or [`estimate_with_auto_threshold`].
//! Diagnostics go through a [`Reporter`](report::Reporter):
//! [`LogReporter`] forwards them to the `log` crate, [`SilentReporter`]
//! drops them.
//!
//! ## Modules
//!
//! - **[`api`]**: High-level estimation functions
//! - **[`core`]**: Estimator and sampler traits, adaptive iteration bound
//! - **[`estimators`]**: Fundamental matrix and homography estimators
//! - **[`ransac`]** / **[`acontrario`]**: The two consensus engines
//! - **[`refine`]**: Refinement and error statistics
//! - **[`settings`]**: Engine configuration, loadable from JSON

pub mod acontrario;
pub mod api;
pub mod core;
pub mod error;
pub mod estimators;
pub mod models;
pub mod ransac;
pub mod refine;
pub mod report;
pub mod samplers;
pub mod scoring;
pub mod settings;
pub mod types;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export high-level API
pub use api::{
    estimate_fundamental_matrix, estimate_fundamental_matrix_auto, estimate_homography,
    estimate_homography_auto, estimate_with_auto_threshold, estimate_with_fixed_threshold,
    Estimate,
};

// Re-export core traits for easy access
pub use core::{Estimator, Sampler};

pub use error::EstimationError;
pub use models::{FundamentalMatrix, Homography};
pub use refine::{ErrorStats, Refinement};
pub use report::{LogReporter, MemoryReporter, Reporter, Severity, SilentReporter};
pub use settings::{load_settings, OrsaSettings, RansacSettings};
pub use types::{Correspondence, ImageSize};
