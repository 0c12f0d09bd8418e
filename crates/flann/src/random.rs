//! A seedable random source shared by index construction and randomized traversal tie-breaks.
//!
//! A single seed controls both, per §5's concurrency model: builds and searches are deterministic
//! given the seed, the dataset, and the parameters.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand::rngs::StdRng;

/// Wraps a [`StdRng`] with the sampling primitives the k-d forest and k-means tree builders need.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seeds a new source. The same seed always produces the same sequence of draws.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Shuffles `indices` in place (Fisher-Yates), used by the k-d forest to permute each tree's
    /// point order before splitting.
    pub fn shuffle(&mut self, indices: &mut [usize]) {
        indices.shuffle(&mut self.rng);
    }

    /// Draws a uniform index in `0..bound`.
    ///
    /// # Panics
    ///
    /// Panics if `bound == 0`.
    pub fn uniform(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }

    /// Draws `count` distinct indices in `0..bound` without replacement, used by k-means'
    /// `random` center-initialization strategy.
    ///
    /// Returns fewer than `count` indices if `bound < count`.
    pub fn choose_unique(&mut self, bound: usize, count: usize) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..bound).collect();
        pool.shuffle(&mut self.rng);
        pool.truncate(count);
        pool
    }

    /// Picks an index with probability proportional to `weights[i]`, used by the k-means++
    /// center-initialization strategy (`weights[i] = min_c d(p_i, c)^2`).
    ///
    /// Falls back to a uniform draw over `weights` if every weight is zero or `weights` is empty.
    pub fn weighted_pick(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() {
            return 0;
        }
        if total <= f64::EPSILON {
            return self.uniform(weights.len());
        }
        let mut target = self.rng.random_range(0.0..total);
        for (i, &w) in weights.iter().enumerate() {
            if target < w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }
}
