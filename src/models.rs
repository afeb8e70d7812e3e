//! Geometric models estimated from two views.
//!
//! Both models are 3x3 matrices acting on homogeneous pixel coordinates.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Planar projective transformation mapping image 1 onto image 2.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }
}

/// Fundamental matrix with the convention `x2^T F x1 = 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundamentalMatrix {
    pub f: Matrix3<f64>,
}

impl FundamentalMatrix {
    pub fn new(f: Matrix3<f64>) -> Self {
        Self { f }
    }
}
