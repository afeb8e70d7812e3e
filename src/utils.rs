//! Miscellaneous numeric and sampling utilities.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Uniform integer generator over a caller-owned random source.
///
/// The generator never creates its own entropy: determinism follows from
/// seeding the source the caller passes in.
pub struct UniformRandomGenerator<'r, R>
where
    R: Rng + ?Sized,
{
    rng: &'r mut R,
    dist: Option<Uniform<usize>>,
}

impl<'r, R> UniformRandomGenerator<'r, R>
where
    R: Rng + ?Sized,
{
    pub fn new(rng: &'r mut R) -> Self {
        Self { rng, dist: None }
    }

    /// Reset the distribution range to `[min, max]`.
    pub fn reset(&mut self, min: usize, max: usize) {
        self.dist = Some(Uniform::new_inclusive(min, max.max(min)));
    }

    /// Draw a single value from the current range, or `0` before any [`reset`](Self::reset).
    pub fn next(&mut self) -> usize {
        match &self.dist {
            Some(dist) => dist.sample(&mut *self.rng),
            None => 0,
        }
    }

    /// Fill `out` with distinct values of `[min, max]`.
    ///
    /// Rejection sampling: suitable for the small sample sizes of minimal
    /// solvers. Returns `false` when the range holds fewer values than `out`.
    pub fn gen_unique(&mut self, out: &mut [usize], min: usize, max: usize) -> bool {
        if max < min || max - min + 1 < out.len() {
            return false;
        }
        self.reset(min, max);
        for i in 0..out.len() {
            loop {
                let candidate = self.next();
                if out[..i].iter().all(|&v| v != candidate) {
                    out[i] = candidate;
                    break;
                }
            }
        }
        true
    }
}

/// `log10 C(n, k)` for every `k` in `0..=n`.
pub fn log_combinations_n(n: usize) -> Vec<f64> {
    let mut table = vec![0.0; n + 1];
    for k in 1..=n {
        table[k] = table[k - 1] + ((n - k + 1) as f64).log10() - (k as f64).log10();
    }
    table
}

/// `log10 C(k, s)` for every `k` in `0..=n`; entries below `s` are zero.
pub fn log_combinations_k(s: usize, n: usize) -> Vec<f64> {
    let mut table = vec![0.0; n + 1];
    for k in (s + 1)..=n {
        table[k] = table[k - 1] + (k as f64).log10() - ((k - s) as f64).log10();
    }
    table
}

/// Real roots of the monic cubic `x^3 + c2*x^2 + c1*x + c0 = 0`.
///
/// Returns the number of roots written to `roots` (1 or 3), each polished by
/// one Newton step. Non-finite roots are dropped.
pub fn solve_cubic_real(c2: f64, c1: f64, c0: f64, roots: &mut [f64; 3]) -> usize {
    let a = c1 - c2 * c2 / 3.0;
    let b = (2.0 * c2 * c2 * c2 - 9.0 * c2 * c1) / 27.0 + c0;
    let mut c = b * b / 4.0 + a * a * a / 27.0;

    let n_roots = if c > 0.0 || a == 0.0 {
        c = c.max(0.0).sqrt();
        let b_neg = -0.5 * b;
        roots[0] = (b_neg + c).cbrt() + (b_neg - c).cbrt() - c2 / 3.0;
        1
    } else {
        c = (3.0 * b / (2.0 * a) * (-3.0 / a).sqrt()).clamp(-1.0, 1.0);
        let d = 2.0 * (-a / 3.0).sqrt();
        let acos_c = c.acos();
        let third = 2.0 * std::f64::consts::FRAC_PI_3;
        roots[0] = d * (acos_c / 3.0).cos() - c2 / 3.0;
        roots[1] = d * (acos_c / 3.0 - third).cos() - c2 / 3.0;
        roots[2] = d * (acos_c / 3.0 - 2.0 * third).cos() - c2 / 3.0;
        3
    };

    for root in roots.iter_mut().take(n_roots) {
        let x = *root;
        let x2 = x * x;
        let derivative = 3.0 * x2 + 2.0 * c2 * x + c1;
        if derivative != 0.0 {
            *root -= (x * x2 + c2 * x2 + c1 * x + c0) / derivative;
        }
    }

    let mut kept = 0;
    for i in 0..n_roots {
        if roots[i].is_finite() {
            roots[kept] = roots[i];
            kept += 1;
        }
    }
    kept
}
