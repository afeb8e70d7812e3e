//! Core shared types: correspondences, image sizes and residual bookkeeping.

use nalgebra::{DMatrix, Point2};
use serde::{Deserialize, Serialize};

use crate::error::EstimationError;

/// Dynamic matrix of `f64` holding one correspondence per row as
/// `[x1, y1, x2, y2]`.
pub type DataMatrix = DMatrix<f64>;

/// A candidate match: `(x1, y1)` in the first image, `(x2, y2)` in the second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Correspondence {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_points(p1: &Point2<f64>, p2: &Point2<f64>) -> Self {
        Self::new(p1.x, p1.y, p2.x, p2.y)
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reject empty images, which admit no normalization nor a-priori probability.
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.width == 0 || self.height == 0 {
            return Err(EstimationError::InvalidImageSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    pub fn diagonal(&self) -> f64 {
        let (w, h) = (self.width as f64, self.height as f64);
        (w * w + h * h).sqrt()
    }
}

/// Image in which a residual is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// Whether residuals are distances to a point (homography) or to a line
/// (epipolar geometry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidualKind {
    Point,
    Line,
}

impl ResidualKind {
    /// Probability that a uniformly random point of `size` falls within unit
    /// distance of the predicted point or line.
    pub fn alpha0(self, size: &ImageSize) -> f64 {
        match self {
            ResidualKind::Point => std::f64::consts::PI / size.area(),
            ResidualKind::Line => 2.0 * size.diagonal() / size.area(),
        }
    }

    /// Exponent turning a squared distance into a probability scale: the
    /// area of a disc grows with `d^2`, the area of a strip with `d`.
    pub fn error_exponent(self) -> f64 {
        match self {
            ResidualKind::Point => 1.0,
            ResidualKind::Line => 0.5,
        }
    }
}

/// Squared pixel error of one correspondence, with the image it is measured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub error: f64,
    pub side: Side,
}

impl Residual {
    pub fn new(error: f64, side: Side) -> Self {
        Self { error, side }
    }
}

/// Pack correspondences into the row layout used by estimators.
pub fn data_matrix(matches: &[Correspondence]) -> DataMatrix {
    let mut data = DataMatrix::zeros(matches.len(), 4);
    for (i, m) in matches.iter().enumerate() {
        data[(i, 0)] = m.x1;
        data[(i, 1)] = m.y1;
        data[(i, 2)] = m.x2;
        data[(i, 3)] = m.y2;
    }
    data
}

/// Pair two parallel point sets, failing when their lengths differ.
pub fn pair_points(
    points1: &[Point2<f64>],
    points2: &[Point2<f64>],
) -> Result<Vec<Correspondence>, EstimationError> {
    if points1.len() != points2.len() {
        return Err(EstimationError::MismatchedLengths {
            left: points1.len(),
            right: points2.len(),
        });
    }
    Ok(points1
        .iter()
        .zip(points2)
        .map(|(p1, p2)| Correspondence::from_points(p1, p2))
        .collect())
}
