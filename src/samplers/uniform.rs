//! Uniform random sampler drawing minimal samples without replacement.

use rand::Rng;

use crate::core::Sampler;
use crate::utils::UniformRandomGenerator;

/// Uniform random sampler drawing minimal samples without replacement.
///
/// Borrows the random source from the caller, so two runs fed identically
/// seeded generators draw identical samples.
pub struct UniformRandomSampler<'r, R>
where
    R: Rng + ?Sized,
{
    rng: UniformRandomGenerator<'r, R>,
    positions: Vec<usize>,
}

impl<'r, R> UniformRandomSampler<'r, R>
where
    R: Rng + ?Sized,
{
    pub fn new(rng: &'r mut R) -> Self {
        Self {
            rng: UniformRandomGenerator::new(rng),
            positions: Vec::new(),
        }
    }
}

impl<R> Sampler for UniformRandomSampler<'_, R>
where
    R: Rng + ?Sized,
{
    fn sample(&mut self, pool: &[usize], out_indices: &mut [usize]) -> bool {
        let k = out_indices.len();
        if k == 0 || pool.len() < k {
            return false;
        }

        self.positions.resize(k, 0);
        if !self.rng.gen_unique(&mut self.positions, 0, pool.len() - 1) {
            return false;
        }
        for (out, &pos) in out_indices.iter_mut().zip(&self.positions) {
            *out = pool[pos];
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draws_distinct_pool_members() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sampler = UniformRandomSampler::new(&mut rng);
        let pool = [4usize, 8, 15, 16, 23, 42];
        let mut out = [0usize; 4];

        for _ in 0..50 {
            assert!(sampler.sample(&pool, &mut out));
            assert!(out.iter().all(|i| pool.contains(i)));
            for i in 0..out.len() {
                for j in (i + 1)..out.len() {
                    assert_ne!(out[i], out[j]);
                }
            }
        }
    }

    #[test]
    fn refuses_pools_smaller_than_the_sample() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sampler = UniformRandomSampler::new(&mut rng);
        let mut out = [0usize; 3];
        assert!(!sampler.sample(&[1, 2], &mut out));
    }

    #[test]
    fn same_seed_same_samples() {
        let pool: Vec<usize> = (0..100).collect();
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut sampler = UniformRandomSampler::new(&mut rng);
            let mut out = [0usize; 7];
            (0..10)
                .map(|_| {
                    sampler.sample(&pool, &mut out);
                    out
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(11), draw(11));
        assert_ne!(draw(11), draw(12));
    }
}
