//! Estimators for two-view geometric models.
//!
//! - Fundamental matrix estimation (7-point minimal, 8-point least squares)
//! - Homography estimation (4-point minimal, DLT least squares)
//!
//! Both solve on coordinates normalized by the image dimensions and return
//! models in pixel coordinates.

pub mod fundamental;
pub mod homography;

pub use fundamental::FundamentalEstimator;
pub use homography::HomographyEstimator;

use nalgebra::{Matrix3, SMatrix, SVector};

use crate::error::EstimationError;
use crate::types::{data_matrix, Correspondence, DataMatrix, ImageSize};

/// Singular values below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-12;

/// Similarity moving the image centre to the origin and its longer side onto `[-1, 1]`.
pub(crate) fn normalization_matrix(size: &ImageSize) -> Matrix3<f64> {
    let (w, h) = (size.width as f64, size.height as f64);
    let s = 2.0 / w.max(h);
    Matrix3::new(s, 0.0, -s * w / 2.0, 0.0, s, -s * h / 2.0, 0.0, 0.0, 1.0)
}

/// Pixel and normalized copies of the correspondences.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedData {
    pub pixels: DataMatrix,
    pub normalized: DataMatrix,
    pub sizes: [ImageSize; 2],
    pub n1: Matrix3<f64>,
    pub n2: Matrix3<f64>,
}

impl NormalizedData {
    pub fn new(
        matches: &[Correspondence],
        size1: ImageSize,
        size2: ImageSize,
    ) -> Result<Self, EstimationError> {
        size1.validate()?;
        size2.validate()?;

        let pixels = data_matrix(matches);
        let n1 = normalization_matrix(&size1);
        let n2 = normalization_matrix(&size2);

        let mut normalized = pixels.clone();
        for i in 0..pixels.nrows() {
            normalized[(i, 0)] = n1[(0, 0)] * pixels[(i, 0)] + n1[(0, 2)];
            normalized[(i, 1)] = n1[(1, 1)] * pixels[(i, 1)] + n1[(1, 2)];
            normalized[(i, 2)] = n2[(0, 0)] * pixels[(i, 2)] + n2[(0, 2)];
            normalized[(i, 3)] = n2[(1, 1)] * pixels[(i, 3)] + n2[(1, 2)];
        }

        Ok(Self {
            pixels,
            normalized,
            sizes: [size1, size2],
            n1,
            n2,
        })
    }

    pub fn len(&self) -> usize {
        self.pixels.nrows()
    }
}

/// Whether every index is in range and appears once.
pub(crate) fn has_distinct_indices(indices: &[usize], n: usize) -> bool {
    // Minimal samples: pairwise comparison, no allocation.
    if indices.len() <= 16 {
        return indices
            .iter()
            .enumerate()
            .all(|(i, &a)| a < n && indices[i + 1..].iter().all(|&b| b != a));
    }
    let mut seen = vec![false; n];
    indices
        .iter()
        .all(|&i| i < n && !std::mem::replace(&mut seen[i], true))
}

/// The `count` right singular vectors of the system whose normal matrix is
/// `ata`, smallest singular value first.
///
/// Returns `None` when the null space is larger than `count`, i.e. the
/// equations do not constrain the solution enough.
pub(crate) fn smallest_singular_vectors(
    ata: SMatrix<f64, 9, 9>,
    count: usize,
) -> Option<Vec<SVector<f64, 9>>> {
    if ata.iter().any(|x| !x.is_finite()) {
        return None;
    }
    let svd = ata.svd(false, true);
    let v_t = svd.v_t?;
    let values = svd.singular_values;

    let mut order: Vec<usize> = (0..9).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let largest = values[order[8]];
    if largest <= 0.0 || values[order[count]] <= RANK_TOLERANCE * largest {
        return None;
    }

    Some(
        order[..count]
            .iter()
            .map(|&k| v_t.row(k).transpose())
            .collect(),
    )
}

/// Scale a matrix to unit Frobenius norm.
pub(crate) fn unit_norm(m: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let norm = m.norm();
    if norm > 0.0 && norm.is_finite() {
        Some(m / norm)
    } else {
        None
    }
}
