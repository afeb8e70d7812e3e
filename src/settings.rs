//! Configuration of the two consensus engines.
//!
//! Settings deserialize from JSON with every field optional; missing fields
//! take the defaults below.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::EstimationError;

/// Settings of the fixed-threshold RANSAC engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacSettings {
    /// Hard cap on the number of iterations.
    pub max_iterations: usize,
    /// Probability of drawing at least one all-inlier sample, in \[0, 1).
    pub confidence: f64,
    /// Re-estimate the model from all inliers once the search is over.
    pub refine: bool,
}

impl Default for RansacSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            confidence: 0.99,
            refine: true,
        }
    }
}

impl RansacSettings {
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.max_iterations == 0 {
            return Err(EstimationError::InvalidSettings(
                "max_iterations must be positive".to_string(),
            ));
        }
        validate_confidence(self.confidence)
    }
}

/// Settings of the a-contrario (ORSA) engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrsaSettings {
    /// Hard cap on the number of iterations, reserve included.
    pub max_iterations: usize,
    /// Upper bound on the inlier threshold in pixels; `None` leaves it open.
    pub max_precision: Option<f64>,
    /// Confidence used to shrink the budget after each meaningful improvement.
    pub confidence: f64,
    /// Fraction of the budget kept for sampling among the best inliers.
    pub reserve_ratio: f64,
    /// Re-estimate the model from all inliers once the search is over.
    pub refine: bool,
    /// Report every improvement of the best NFA.
    pub verbose: bool,
}

impl Default for OrsaSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_precision: None,
            confidence: 0.99,
            reserve_ratio: 0.1,
            refine: true,
            verbose: false,
        }
    }
}

impl OrsaSettings {
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.max_iterations == 0 {
            return Err(EstimationError::InvalidSettings(
                "max_iterations must be positive".to_string(),
            ));
        }
        if let Some(precision) = self.max_precision {
            if !(precision > 0.0) {
                return Err(EstimationError::InvalidSettings(format!(
                    "max_precision must be positive, got {}",
                    precision
                )));
            }
        }
        if !(0.0..1.0).contains(&self.reserve_ratio) {
            return Err(EstimationError::InvalidSettings(format!(
                "reserve_ratio must lie in [0, 1), got {}",
                self.reserve_ratio
            )));
        }
        validate_confidence(self.confidence)
    }

    /// Squared pixel threshold residuals must not exceed.
    pub fn max_squared_error(&self) -> f64 {
        self.max_precision.map_or(f64::INFINITY, |p| p * p)
    }
}

fn validate_confidence(confidence: f64) -> Result<(), EstimationError> {
    if (0.0..1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(EstimationError::InvalidSettings(format!(
            "confidence must lie in [0, 1), got {}",
            confidence
        )))
    }
}

/// Load settings from a JSON file.
pub fn load_settings<T: DeserializeOwned>(path: &Path) -> Result<T, EstimationError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
