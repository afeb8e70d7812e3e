//! Synthetic two-view scenes shared by the unit tests.

use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Correspondence;

pub const WIDTH: f64 = 1000.0;
pub const HEIGHT: f64 = 800.0;

fn intrinsics() -> Matrix3<f64> {
    Matrix3::new(800.0, 0.0, 500.0, 0.0, 800.0, 400.0, 0.0, 0.0, 1.0)
}

fn relative_pose() -> (Matrix3<f64>, Vector3<f64>) {
    let r = Rotation3::from_euler_angles(0.05, 0.1, 0.02);
    (*r.matrix(), Vector3::new(-1.0, 0.1, 0.05))
}

fn skew(t: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -t.z, t.y, t.z, 0.0, -t.x, -t.y, t.x, 0.0)
}

/// Fundamental matrix of the synthetic camera pair, `x2^T F x1 = 0`.
pub fn ground_truth_fundamental() -> Matrix3<f64> {
    let k = intrinsics();
    let k_inv = k.try_inverse().unwrap();
    let (r, t) = relative_pose();
    k_inv.transpose() * skew(&t) * r * k_inv
}

/// Zero-mean Gaussian sample (Box-Muller).
pub fn gaussian<R: Rng>(rng: &mut R, sigma: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// `n` projections of random scene points with Gaussian pixel noise of `sigma`.
pub fn epipolar_scene(n: usize, sigma: f64, seed: u64) -> Vec<Correspondence> {
    let mut rng = StdRng::seed_from_u64(seed);
    let k = intrinsics();
    let (r, t) = relative_pose();
    (0..n)
        .map(|_| {
            let x = Point3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(8.0..16.0),
            );
            let p1 = k * x.coords;
            let p2 = k * (r * x.coords + t);
            Correspondence::new(
                p1.x / p1.z + gaussian(&mut rng, sigma),
                p1.y / p1.z + gaussian(&mut rng, sigma),
                p2.x / p2.z + gaussian(&mut rng, sigma),
                p2.y / p2.z + gaussian(&mut rng, sigma),
            )
        })
        .collect()
}

/// `n` unrelated point pairs drawn uniformly over both images.
pub fn random_matches(n: usize, seed: u64) -> Vec<Correspondence> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Correspondence::new(
                rng.gen_range(0.0..WIDTH),
                rng.gen_range(0.0..HEIGHT),
                rng.gen_range(0.0..WIDTH),
                rng.gen_range(0.0..HEIGHT),
            )
        })
        .collect()
}

/// Points of a plane seen by both cameras, related by a homography.
pub fn planar_scene(n: usize, h: &Matrix3<f64>, sigma: f64, seed: u64) -> Vec<Correspondence> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let p1 = Vector3::new(rng.gen_range(50.0..950.0), rng.gen_range(50.0..750.0), 1.0);
            let p2 = h * p1;
            Correspondence::new(
                p1.x + gaussian(&mut rng, sigma),
                p1.y + gaussian(&mut rng, sigma),
                p2.x / p2.z + gaussian(&mut rng, sigma),
                p2.y / p2.z + gaussian(&mut rng, sigma),
            )
        })
        .collect()
}

/// Mild perspective warp used by the homography tests.
pub fn ground_truth_homography() -> Matrix3<f64> {
    Matrix3::new(0.9, 0.05, 30.0, -0.04, 1.1, -20.0, 1e-5, -2e-5, 1.0)
}
