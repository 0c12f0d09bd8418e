//! Synthetic data generation and ground-truth helpers for tests and benchmarks: uniform cubes and
//! Gaussian blobs (§1 ambient stack, scenarios S1/S2/S5).

use rand::SeedableRng;
use rand_distr::Distribution;

use crate::dataset::Dataset;
use crate::linear;
use flann_distances::{Distance, Metric, Number};

/// Draws `rows` points uniform in `[0, 1)^cols`, flattened row-major.
#[must_use]
pub fn uniform_cube(rows: usize, cols: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    #[allow(clippy::unwrap_used)]
    let dist = rand_distr::Uniform::new(0.0_f64, 1.0_f64).unwrap();
    (0..rows * cols).map(|_| dist.sample(&mut rng)).collect()
}

/// Draws `rows` points from `blobs` Gaussian clusters in `cols` dimensions, each blob centered at
/// a uniformly random point in `[0, spread)^cols` with standard deviation `std_dev`. Returns the
/// flattened points and each point's generating blob index, in the order blobs were assigned
/// (blob `i` gets `rows / blobs` points, remainder assigned to the last blob).
#[must_use]
pub fn gaussian_blobs(rows: usize, cols: usize, blobs: usize, spread: f64, std_dev: f64, seed: u64) -> (Vec<f64>, Vec<usize>, Vec<Vec<f64>>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    #[allow(clippy::unwrap_used)]
    let center_dist = rand_distr::Uniform::new(0.0_f64, spread).unwrap();
    #[allow(clippy::unwrap_used)]
    let point_dist = rand_distr::Normal::new(0.0_f64, std_dev).unwrap();

    let centers: Vec<Vec<f64>> = (0..blobs.max(1)).map(|_| (0..cols).map(|_| center_dist.sample(&mut rng)).collect()).collect();

    let mut flat = Vec::with_capacity(rows * cols);
    let mut labels = Vec::with_capacity(rows);
    for i in 0..rows {
        let blob = i % centers.len();
        labels.push(blob);
        for d in 0..cols {
            flat.push(centers[blob][d] + point_dist.sample(&mut rng));
        }
    }
    (flat, labels, centers)
}

/// Computes exact top-`k` neighbors for every row in `queries` against `dataset`, via linear scan,
/// for use as ground truth in recall/precision assertions.
#[must_use]
pub fn ground_truth<T: Number>(dataset: &Dataset<'_, T>, distance: &Distance, queries: &[T], cols: usize, k: usize) -> Vec<Vec<(f64, usize)>>
where
    Distance: Metric<T>,
{
    queries.chunks(cols).map(|q| linear::knn(dataset, distance, q, k)).collect()
}

/// Fraction of `results` whose top-1 id matches `truth`'s top-1 id, pairwise.
#[must_use]
pub fn top1_precision(results: &[Vec<(f64, usize)>], truth: &[Vec<(f64, usize)>]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let hits = results
        .iter()
        .zip(truth)
        .filter(|(r, t)| matches!((r.first(), t.first()), (Some(&(_, rid)), Some(&(_, tid))) if rid == tid))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let precision = hits as f64 / results.len() as f64;
    precision
}
