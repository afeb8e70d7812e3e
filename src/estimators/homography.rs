//! Homography estimator using the normalized DLT.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use super::{has_distinct_indices, smallest_singular_vectors, unit_norm, NormalizedData};
use crate::core::Estimator;
use crate::error::EstimationError;
use crate::models::Homography;
use crate::types::{Correspondence, ImageSize, Residual, ResidualKind, Side};

/// Normalized homographies with a smaller determinant are rejected as singular.
const MIN_NORMALIZED_DET: f64 = 1e-8;

/// Homography estimator over a fixed set of correspondences.
///
/// Minimal samples have 4 correspondences. The same DLT system is solved in
/// the least-squares sense for larger sets.
#[derive(Debug, Clone)]
pub struct HomographyEstimator {
    data: NormalizedData,
}

impl HomographyEstimator {
    pub fn new(
        matches: &[Correspondence],
        size1: ImageSize,
        size2: ImageSize,
    ) -> Result<Self, EstimationError> {
        Ok(Self {
            data: NormalizedData::new(matches, size1, size2)?,
        })
    }

    fn normal_matrix(&self, indices: &[usize]) -> SMatrix<f64, 9, 9> {
        let d = &self.data.normalized;
        let mut ata = SMatrix::<f64, 9, 9>::zeros();
        for &i in indices {
            let (x, y, u, v) = (d[(i, 0)], d[(i, 1)], d[(i, 2)], d[(i, 3)]);
            let row_u = SVector::<f64, 9>::from_column_slice(&[
                -x, -y, -1.0, 0.0, 0.0, 0.0, u * x, u * y, u,
            ]);
            let row_v = SVector::<f64, 9>::from_column_slice(&[
                0.0, 0.0, 0.0, -x, -y, -1.0, v * x, v * y, v,
            ]);
            ata += row_u * row_u.transpose() + row_v * row_v.transpose();
        }
        ata
    }

    fn dlt(&self, indices: &[usize]) -> Option<Homography> {
        let solution = smallest_singular_vectors(self.normal_matrix(indices), 1)?;
        let hn = unit_norm(Matrix3::from_row_slice(solution[0].as_slice()))?;
        if hn.determinant().abs() < MIN_NORMALIZED_DET {
            return None;
        }
        let n2_inv = self.data.n2.try_inverse()?;
        unit_norm(n2_inv * hn * self.data.n1).map(Homography::new)
    }

    fn point(&self, index: usize, side: Side) -> Vector3<f64> {
        let d = &self.data.pixels;
        let col = 2 * side.index();
        Vector3::new(d[(index, col)], d[(index, col + 1)], 1.0)
    }
}

/// Squared distance between `target` and the dehomogenized `projected`.
fn squared_transfer_error(projected: &Vector3<f64>, target: &Vector3<f64>) -> f64 {
    if projected.z.abs() <= f64::EPSILON * projected.norm() {
        return f64::INFINITY;
    }
    let dx = projected.x / projected.z - target.x;
    let dy = projected.y / projected.z - target.y;
    dx * dx + dy * dy
}

impl Estimator for HomographyEstimator {
    type Model = Homography;

    fn sample_size(&self) -> usize {
        4
    }

    fn max_models(&self) -> usize {
        1
    }

    fn residual_kind(&self) -> ResidualKind {
        ResidualKind::Point
    }

    fn num_data(&self) -> usize {
        self.data.len()
    }

    fn image_size(&self, side: Side) -> ImageSize {
        self.data.sizes[side.index()]
    }

    fn fit(&self, indices: &[usize]) -> Vec<Self::Model> {
        if indices.len() < self.sample_size() || !has_distinct_indices(indices, self.num_data())
        {
            return Vec::new();
        }
        self.dlt(indices).into_iter().collect()
    }

    fn error(&self, model: &Self::Model, index: usize) -> f64 {
        let p1 = self.point(index, Side::First);
        let p2 = self.point(index, Side::Second);
        squared_transfer_error(&(model.h * p1), &p2)
    }

    fn sided_error(&self, model: &Self::Model, index: usize) -> Residual {
        let forward = self.error(model, index);
        let backward = match model.h.try_inverse() {
            Some(inv) => {
                let p1 = self.point(index, Side::First);
                let p2 = self.point(index, Side::Second);
                squared_transfer_error(&(inv * p2), &p1)
            }
            None => f64::INFINITY,
        };
        if backward > forward {
            Residual::new(backward, Side::First)
        } else {
            Residual::new(forward, Side::Second)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ground_truth_homography, planar_scene};
    use approx::assert_relative_eq;

    fn size() -> ImageSize {
        ImageSize::new(1000, 800)
    }

    fn same_up_to_scale(a: &Matrix3<f64>, b: &Matrix3<f64>) -> f64 {
        let a = a / a[(2, 2)];
        let b = b / b[(2, 2)];
        (a - b).norm()
    }

    #[test]
    fn four_points_recover_the_warp() {
        let truth = ground_truth_homography();
        let matches = planar_scene(4, &truth, 0.0, 4);
        let estimator = HomographyEstimator::new(&matches, size(), size()).unwrap();

        let models = estimator.fit(&[0, 1, 2, 3]);
        assert_eq!(models.len(), 1);
        assert!(same_up_to_scale(&models[0].h, &truth) < 1e-6);
        for i in 0..4 {
            assert!(estimator.error(&models[0], i) < 1e-8);
        }
    }

    #[test]
    fn least_squares_on_noisy_points() {
        let truth = ground_truth_homography();
        let matches = planar_scene(100, &truth, 0.5, 8);
        let estimator = HomographyEstimator::new(&matches, size(), size()).unwrap();
        let all: Vec<usize> = (0..100).collect();

        let model = estimator.compute_model(&all).unwrap();
        let mean: f64 = all.iter().map(|&i| estimator.error(&model, i)).sum::<f64>() / 100.0;
        // Expected squared transfer error is about 2 * sigma^2 per image.
        assert!(mean < 2.0, "mean squared error {}", mean);
    }

    #[test]
    fn collinear_sample_is_degenerate() {
        let matches: Vec<Correspondence> = (0..4)
            .map(|i| {
                let x = 100.0 + 50.0 * i as f64;
                Correspondence::new(x, 2.0 * x, x + 5.0, 2.0 * x - 3.0)
            })
            .collect();
        let estimator = HomographyEstimator::new(&matches, size(), size()).unwrap();
        assert!(estimator.fit(&[0, 1, 2, 3]).is_empty());
        assert!(estimator.compute_model(&[0, 1, 2, 3]).is_err());
    }

    #[test]
    fn symmetric_error_uses_the_inverse() {
        // Pure scaling by 2: backward distances are half the forward ones.
        let h = Homography::new(Matrix3::new(2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0));
        let matches = [Correspondence::new(10.0, 10.0, 24.0, 20.0)];
        let estimator = HomographyEstimator::new(&matches, size(), size()).unwrap();

        assert_relative_eq!(estimator.error(&h, 0), 16.0);
        let residual = estimator.sided_error(&h, 0);
        assert_eq!(residual.side, Side::Second);
        assert_relative_eq!(residual.error, 16.0);
    }
}
