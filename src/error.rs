//! Error taxonomy of the estimation pipeline.

use thiserror::Error;

/// Errors and negative results reported by the estimators.
#[derive(Debug, Error)]
pub enum EstimationError {
    /// Fewer correspondences than the method needs to proceed.
    #[error("{method} needs at least {required} correspondences, got {actual}")]
    InsufficientData {
        /// Name of the method that refused to run
        method: &'static str,
        /// Minimum number of correspondences
        required: usize,
        /// Number of correspondences provided
        actual: usize,
    },

    /// The two point sets do not have the same length.
    #[error("Mismatched point sets: {left} points in image 1, {right} in image 2")]
    MismatchedLengths { left: usize, right: usize },

    /// An image with a zero dimension.
    #[error("Invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    /// The indexed correspondences do not determine a model.
    #[error("Degenerate sample: no model could be computed")]
    DegenerateSample,

    /// The a-contrario test found no configuration with NFA < 1.
    #[error("No meaningful model found (best log10 NFA = {log_nfa})")]
    NotMeaningful {
        /// Best `log10(NFA)` reached, non-negative or infinite
        log_nfa: f64,
        /// Iterations performed
        iterations: usize,
    },

    /// Settings outside of their valid domain.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings file could not be read.
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed.
    #[error("Failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl EstimationError {
    /// Whether this is the legitimate "no structure in the data" outcome
    /// rather than a failure.
    pub fn is_negative_result(&self) -> bool {
        matches!(self, EstimationError::NotMeaningful { .. })
    }
}
