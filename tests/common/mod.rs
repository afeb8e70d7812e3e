//! Synthetic two-view scenes for the integration tests.

#![allow(dead_code)]

use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use orsa::{Correspondence, ImageSize};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SIZE: ImageSize = ImageSize {
    width: 1000,
    height: 800,
};

fn intrinsics() -> Matrix3<f64> {
    Matrix3::new(800.0, 0.0, 500.0, 0.0, 800.0, 400.0, 0.0, 0.0, 1.0)
}

/// Zero-mean uniform noise with standard deviation `sigma`.
fn noise(rng: &mut StdRng, sigma: f64) -> f64 {
    if sigma == 0.0 {
        return 0.0;
    }
    let half_width = sigma * 3f64.sqrt();
    rng.gen_range(-half_width..half_width)
}

/// Projections of random scene points in two cameras, with noise of
/// `sigma` pixels on the second image.
pub fn epipolar_matches(n: usize, sigma: f64, seed: u64) -> Vec<Correspondence> {
    let mut rng = StdRng::seed_from_u64(seed);
    let k = intrinsics();
    let r = *Rotation3::from_euler_angles(-0.04, 0.12, 0.03).matrix();
    let t = Vector3::new(1.0, -0.2, 0.1);
    let mut matches = Vec::with_capacity(n);
    while matches.len() < n {
        let x = Point3::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-4.0..4.0),
            rng.gen_range(9.0..18.0),
        );
        let p1 = k * x.coords;
        let p2 = k * (r * x.coords + t);
        let (u1, v1) = (p1.x / p1.z, p1.y / p1.z);
        let (u2, v2) = (
            p2.x / p2.z + noise(&mut rng, sigma),
            p2.y / p2.z + noise(&mut rng, sigma),
        );
        let inside = |u: f64, v: f64| (0.0..1000.0).contains(&u) && (0.0..800.0).contains(&v);
        if inside(u1, v1) && inside(u2, v2) {
            matches.push(Correspondence::new(u1, v1, u2, v2));
        }
    }
    matches
}

/// Unrelated point pairs spread uniformly over both images.
pub fn outlier_matches(n: usize, seed: u64) -> Vec<Correspondence> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Correspondence::new(
                rng.gen_range(0.0..1000.0),
                rng.gen_range(0.0..800.0),
                rng.gen_range(0.0..1000.0),
                rng.gen_range(0.0..800.0),
            )
        })
        .collect()
}

/// Points related by a fixed homography, with noise of `sigma` pixels on the
/// second image.
pub fn planar_matches(n: usize, sigma: f64, seed: u64) -> Vec<Correspondence> {
    let mut rng = StdRng::seed_from_u64(seed);
    let h = Matrix3::new(1.05, -0.03, 25.0, 0.02, 0.95, 10.0, 2e-5, 1e-5, 1.0);
    (0..n)
        .map(|_| {
            let p1 = Vector3::new(rng.gen_range(40.0..900.0), rng.gen_range(40.0..700.0), 1.0);
            let p2 = h * p1;
            Correspondence::new(
                p1.x,
                p1.y,
                p2.x / p2.z + noise(&mut rng, sigma),
                p2.y / p2.z + noise(&mut rng, sigma),
            )
        })
        .collect()
}

/// Every index distinct and below `n`.
pub fn valid_index_set(indices: &[usize], n: usize) -> bool {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len() == indices.len() && indices.iter().all(|&i| i < n)
}
