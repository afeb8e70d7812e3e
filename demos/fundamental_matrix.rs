//! Fundamental matrix estimation on a synthetic scene.
//!
//! Run with `RUST_LOG=info cargo run --example fundamental_matrix`.

use nalgebra::{Matrix3, Rotation3, Vector3};
use orsa::{
    estimate_fundamental_matrix, estimate_fundamental_matrix_auto, Correspondence, ImageSize,
    LogReporter,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let size = ImageSize::new(1000, 800);
    let mut rng = StdRng::seed_from_u64(42);

    // Camera intrinsics (pinhole, f=800, principal point at the image centre)
    let k = Matrix3::new(800.0, 0.0, 500.0, 0.0, 800.0, 400.0, 0.0, 0.0, 1.0);
    let r = *Rotation3::from_euler_angles(0.02, 0.15, -0.01).matrix();
    let t = Vector3::new(1.0, 0.05, 0.1);

    // 200 scene points seen by both cameras, 2 px noise in the second image
    let mut matches = Vec::new();
    while matches.len() < 200 {
        let x = Vector3::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-4.0..4.0),
            rng.gen_range(9.0..18.0),
        );
        let p1 = k * x;
        let p2 = k * (r * x + t);
        let noise = (rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        let m = Correspondence::new(
            p1.x / p1.z,
            p1.y / p1.z,
            p2.x / p2.z + noise.0,
            p2.y / p2.z + noise.1,
        );
        if m.x2 >= 0.0 && m.x2 < 1000.0 && m.y2 >= 0.0 && m.y2 < 800.0 {
            matches.push(m);
        }
    }

    // 100 mismatches
    for _ in 0..100 {
        matches.push(Correspondence::new(
            rng.gen_range(0.0..1000.0),
            rng.gen_range(0.0..800.0),
            rng.gen_range(0.0..1000.0),
            rng.gen_range(0.0..800.0),
        ));
    }

    println!("ORSA on {} correspondences", matches.len());
    match estimate_fundamental_matrix_auto(&matches, size, size, None, &mut rng, &LogReporter) {
        Ok(estimate) => {
            println!(
                "  {} inliers, precision {:.2} px, log10 NFA {:.1}",
                estimate.inliers.len(),
                estimate.precision,
                estimate.log_nfa.unwrap_or(f64::NAN)
            );
            let stats = estimate.refinement.final_stats();
            println!("  average/max error: {:.3}/{:.3}", stats.rms, stats.max);
            if let Some(model) = &estimate.model {
                println!("  F = {}", model.f);
            }
        }
        Err(err) if err.is_negative_result() => println!("  no meaningful model: {}", err),
        Err(err) => return Err(err.into()),
    }

    println!("RANSAC with a 3 px threshold");
    let estimate =
        estimate_fundamental_matrix(&matches, size, size, 3.0, None, &mut rng, &LogReporter)?;
    println!(
        "  {} inliers in {} iterations",
        estimate.inliers.len(),
        estimate.iterations
    );

    Ok(())
}
