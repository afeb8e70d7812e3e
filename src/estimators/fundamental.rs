//! Fundamental matrix estimator using the 7-point and 8-point algorithms.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use super::{has_distinct_indices, smallest_singular_vectors, unit_norm, NormalizedData};
use crate::core::Estimator;
use crate::error::EstimationError;
use crate::models::FundamentalMatrix;
use crate::types::{Correspondence, ImageSize, Residual, ResidualKind, Side};
use crate::utils::solve_cubic_real;

/// Coefficients below this fraction of the largest one are treated as zero.
const POLY_TOLERANCE: f64 = 1e-10;

/// Fundamental matrix estimator over a fixed set of correspondences.
///
/// Minimal samples have 7 correspondences and yield up to three matrices;
/// larger sets are fitted with the linear 8-point algorithm followed by
/// rank-2 enforcement.
#[derive(Debug, Clone)]
pub struct FundamentalEstimator {
    data: NormalizedData,
}

impl FundamentalEstimator {
    pub fn new(
        matches: &[Correspondence],
        size1: ImageSize,
        size2: ImageSize,
    ) -> Result<Self, EstimationError> {
        Ok(Self {
            data: NormalizedData::new(matches, size1, size2)?,
        })
    }

    /// Row of the linear system `x2^T F x1 = 0` in normalized coordinates.
    fn epipolar_row(&self, index: usize) -> SVector<f64, 9> {
        let d = &self.data.normalized;
        let (x1, y1, x2, y2) = (d[(index, 0)], d[(index, 1)], d[(index, 2)], d[(index, 3)]);
        SVector::<f64, 9>::from_column_slice(&[
            x2 * x1,
            x2 * y1,
            x2,
            y2 * x1,
            y2 * y1,
            y2,
            x1,
            y1,
            1.0,
        ])
    }

    fn normal_matrix(&self, indices: &[usize]) -> SMatrix<f64, 9, 9> {
        let mut ata = SMatrix::<f64, 9, 9>::zeros();
        for &i in indices {
            let row = self.epipolar_row(i);
            ata += row * row.transpose();
        }
        ata
    }

    /// Back to pixel coordinates: `F = N2^T Fn N1`, scaled to unit norm.
    fn unnormalize(&self, f: &Matrix3<f64>) -> Option<FundamentalMatrix> {
        unit_norm(self.data.n2.transpose() * f * self.data.n1).map(FundamentalMatrix::new)
    }

    fn seven_point(&self, indices: &[usize]) -> Vec<FundamentalMatrix> {
        let basis = match smallest_singular_vectors(self.normal_matrix(indices), 2) {
            Some(basis) => basis,
            None => return Vec::new(),
        };
        let f1 = Matrix3::from_row_slice(basis[0].as_slice());
        let f2 = Matrix3::from_row_slice(basis[1].as_slice());

        // det(lambda * F1 + F2) is a cubic in lambda; recover its coefficients
        // from four evaluations.
        let det = |lambda: f64| (f1 * lambda + f2).determinant();
        let (d0, d1, dm1, d2) = (det(0.0), det(1.0), det(-1.0), det(2.0));
        let c0 = d0;
        let c2 = 0.5 * (d1 + dm1) - d0;
        let odd = 0.5 * (d1 - dm1);
        let c3 = (d2 - 4.0 * c2 - c0 - 2.0 * odd) / 6.0;
        let c1 = odd - c3;

        let scale = [c3, c2, c1, c0].iter().fold(0.0f64, |m, c| m.max(c.abs()));
        if scale == 0.0 || !scale.is_finite() {
            return Vec::new();
        }

        let mut candidates = Vec::with_capacity(3);
        if c3.abs() > POLY_TOLERANCE * scale {
            let mut roots = [0.0; 3];
            let n_roots = solve_cubic_real(c2 / c3, c1 / c3, c0 / c3, &mut roots);
            candidates.extend(roots[..n_roots].iter().map(|&l| f1 * l + f2));
        } else {
            // The root at infinity: F1 itself is singular.
            candidates.push(f1);
            if c2.abs() > POLY_TOLERANCE * scale {
                let disc = c1 * c1 - 4.0 * c2 * c0;
                if disc >= 0.0 {
                    let sq = disc.sqrt();
                    candidates.push(f1 * ((-c1 + sq) / (2.0 * c2)) + f2);
                    candidates.push(f1 * ((-c1 - sq) / (2.0 * c2)) + f2);
                }
            } else if c1.abs() > POLY_TOLERANCE * scale {
                candidates.push(f1 * (-c0 / c1) + f2);
            }
        }

        candidates
            .iter()
            .filter_map(|f| self.unnormalize(f))
            .collect()
    }

    fn eight_point(&self, indices: &[usize]) -> Vec<FundamentalMatrix> {
        let solution = match smallest_singular_vectors(self.normal_matrix(indices), 1) {
            Some(basis) => basis,
            None => return Vec::new(),
        };
        let f = Matrix3::from_row_slice(solution[0].as_slice());
        enforce_rank2(f)
            .and_then(|f| self.unnormalize(&f))
            .into_iter()
            .collect()
    }

    /// Squared distances of the correspondence to its epipolar lines, in
    /// image 2 (`F x1`) and image 1 (`F^T x2`).
    fn epipolar_errors(&self, f: &Matrix3<f64>, index: usize) -> (f64, f64) {
        let d = &self.data.pixels;
        let p1 = Vector3::new(d[(index, 0)], d[(index, 1)], 1.0);
        let p2 = Vector3::new(d[(index, 2)], d[(index, 3)], 1.0);
        let line2 = f * p1;
        let line1 = f.transpose() * p2;
        let algebraic = p2.dot(&line2);
        (
            squared_line_distance(algebraic, &line2),
            squared_line_distance(algebraic, &line1),
        )
    }
}

/// `d^2 / (a^2 + b^2)` for a line `(a, b, c)` and algebraic residual `d`.
fn squared_line_distance(algebraic: f64, line: &Vector3<f64>) -> f64 {
    let normal = line.x * line.x + line.y * line.y;
    if normal > 0.0 {
        algebraic * algebraic / normal
    } else {
        f64::INFINITY
    }
}

/// Nearest rank-2 matrix: null the smallest singular value.
pub fn enforce_rank2(f: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let svd = f.svd(true, true);
    let (u, v_t) = (svd.u?, svd.v_t?);
    let mut s = svd.singular_values;
    let (smallest, _) = s.argmin();
    s[smallest] = 0.0;
    Some(u * Matrix3::from_diagonal(&s) * v_t)
}

impl Estimator for FundamentalEstimator {
    type Model = FundamentalMatrix;

    fn sample_size(&self) -> usize {
        7
    }

    fn max_models(&self) -> usize {
        3
    }

    fn residual_kind(&self) -> ResidualKind {
        ResidualKind::Line
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
        if indices.len() == self.sample_size() {
            self.seven_point(indices)
        } else {
            self.eight_point(indices)
        }
    }

    fn error(&self, model: &Self::Model, index: usize) -> f64 {
        self.epipolar_errors(&model.f, index).0
    }

    fn sided_error(&self, model: &Self::Model, index: usize) -> Residual {
        let (second, first) = self.epipolar_errors(&model.f, index);
        if first > second {
            Residual::new(first, Side::First)
        } else {
            Residual::new(second, Side::Second)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{epipolar_scene, ground_truth_fundamental};
    use approx::assert_relative_eq;

    fn size() -> ImageSize {
        ImageSize::new(1000, 800)
    }

    #[test]
    fn seven_point_recovers_exact_geometry() {
        let matches = epipolar_scene(7, 0.0, 5);
        let estimator = FundamentalEstimator::new(&matches, size(), size()).unwrap();
        let sample: Vec<usize> = (0..7).collect();

        let models = estimator.fit(&sample);
        assert!(!models.is_empty() && models.len() <= 3);

        for model in &models {
            assert!(model.f.determinant().abs() < 1e-8);
            for &i in &sample {
                assert!(estimator.error(model, i) < 1e-6, "residual too large");
            }
        }
    }

    #[test]
    fn eight_point_matches_ground_truth_up_to_scale() {
        let matches = epipolar_scene(40, 0.0, 9);
        let estimator = FundamentalEstimator::new(&matches, size(), size()).unwrap();
        let all: Vec<usize> = (0..matches.len()).collect();

        let model = estimator.compute_model(&all).unwrap();
        let truth = ground_truth_fundamental();
        let truth = truth / truth.norm();
        let sign = if (model.f - truth).norm() < (model.f + truth).norm() { 1.0 } else { -1.0 };
        assert!((model.f * sign - truth).norm() < 1e-5);
        assert!(model.f.determinant().abs() < 1e-10);
    }

    #[test]
    fn least_squares_output_is_rank_two_with_noise() {
        let matches = epipolar_scene(60, 1.0, 3);
        let estimator = FundamentalEstimator::new(&matches, size(), size()).unwrap();
        let all: Vec<usize> = (0..matches.len()).collect();
        let model = estimator.compute_model(&all).unwrap();

        let singular = model.f.svd(false, false).singular_values;
        assert!(singular.min() < 1e-9 * singular.max());
    }

    #[test]
    fn symmetric_error_reports_the_larger_side() {
        let matches = epipolar_scene(20, 2.0, 1);
        let estimator = FundamentalEstimator::new(&matches, size(), size()).unwrap();
        let model = FundamentalMatrix::new(ground_truth_fundamental());

        for i in 0..matches.len() {
            let one_sided = estimator.error(&model, i);
            let residual = estimator.sided_error(&model, i);
            assert!(residual.error >= one_sided);
            if residual.side == Side::Second {
                assert_relative_eq!(residual.error, one_sided);
            }
        }
    }

    #[test]
    fn error_is_point_to_line_distance() {
        // F maps (x1, y1) to the horizontal line y2 = y1.
        let f = Matrix3::new(0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0);
        let matches = [Correspondence::new(10.0, 20.0, 50.0, 23.0)];
        let estimator = FundamentalEstimator::new(&matches, size(), size()).unwrap();
        assert_relative_eq!(estimator.error(&FundamentalMatrix::new(f), 0), 9.0);
    }

    #[test]
    fn duplicated_or_short_samples_are_degenerate() {
        let matches = epipolar_scene(10, 0.0, 2);
        let estimator = FundamentalEstimator::new(&matches, size(), size()).unwrap();
        assert!(estimator.fit(&[0, 1, 2, 3, 4, 5]).is_empty());
        assert!(estimator.fit(&[0, 1, 2, 3, 4, 5, 5]).is_empty());
        assert!(matches!(
            estimator.compute_model(&[0, 1, 2]),
            Err(EstimationError::DegenerateSample)
        ));
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let matches = vec![Correspondence::new(100.0, 200.0, 120.0, 210.0); 8];
        let estimator = FundamentalEstimator::new(&matches, size(), size()).unwrap();
        let all: Vec<usize> = (0..8).collect();
        assert!(estimator.fit(&all).is_empty());
        assert!(estimator.fit(&all[..7]).is_empty());
    }

    #[test]
    fn rank2_projection_nulls_smallest_singular_value() {
        let m = Matrix3::new(3.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.5);
        let r = enforce_rank2(m).unwrap();
        let expected = Matrix3::new(3.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0);
        assert_relative_eq!(r, expected, epsilon = 1e-12);
    }
}
