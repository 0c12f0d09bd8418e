//! Recursive Lloyd's-iteration build for the hierarchical k-means tree (§4.5 "Build").

use flann_distances::{Distance, Metric, Number};

use crate::arena::{Arena, NodeId};
use crate::dataset::Dataset;
use crate::params::CentersInit;
use crate::random::RandomSource;

use super::node::{Node, NodeKind};

/// Construction-time knobs threaded down through every recursive call.
pub(super) struct Config {
    pub(super) branching: usize,
    pub(super) iterations: usize,
    pub(super) centers_init: CentersInit,
    pub(super) cb_index: f64,
}

/// Builds one hierarchical k-means tree over every live row of `dataset`.
pub(super) fn build_tree<T: Number>(dataset: &Dataset<'_, T>, config: &Config, rng: &mut RandomSource, arena: &mut Arena<Node>, distance: &Distance) -> NodeId
where
    Distance: Metric<T>,
{
    let mut indices: Vec<usize> = (0..dataset.rows()).filter(|&i| !dataset.is_removed(i)).collect();
    build_node(&mut indices, dataset, config, rng, arena, distance)
}

fn build_node<T: Number>(indices: &mut [usize], dataset: &Dataset<'_, T>, config: &Config, rng: &mut RandomSource, arena: &mut Arena<Node>, distance: &Distance) -> NodeId
where
    Distance: Metric<T>,
{
    let cols = dataset.cols();
    let pivot = mean_of(indices, dataset, cols);
    let pivot_t = to_element_type::<T>(&pivot);
    let (variance, radius) = spread(indices, dataset, &pivot_t, distance);

    if indices.len() < config.branching.max(1) {
        let mut point_ids = indices.to_vec();
        point_ids.sort_unstable();
        return arena.allocate(Node {
            pivot,
            variance,
            radius,
            kind: NodeKind::Leaf { point_ids },
        });
    }

    let Some(centers) = seed_centers(indices, dataset, config, rng, distance) else {
        let mut point_ids = indices.to_vec();
        point_ids.sort_unstable();
        return arena.allocate(Node {
            pivot,
            variance,
            radius,
            kind: NodeKind::Leaf { point_ids },
        });
    };

    let assignments = lloyd(indices, dataset, centers, config, distance);

    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); config.branching];
    for (slot, &point_idx) in indices.iter().enumerate() {
        buckets[assignments[slot]].push(point_idx);
    }

    let children: Vec<NodeId> = buckets
        .into_iter()
        .filter(|bucket| !bucket.is_empty())
        .map(|mut bucket| build_node(&mut bucket, dataset, config, rng, arena, distance))
        .collect();

    arena.allocate(Node {
        pivot,
        variance,
        radius,
        kind: NodeKind::Internal { children },
    })
}

/// Element-wise mean over `indices`, in `f64` regardless of `T` (§4.5: "centers are accumulated in
/// double precision").
fn mean_of<T: Number>(indices: &[usize], dataset: &Dataset<'_, T>, cols: usize) -> Vec<f64> {
    let mut sum = vec![0.0_f64; cols];
    for &idx in indices {
        for (d, &value) in dataset.row(idx).iter().enumerate() {
            sum[d] += value.as_f64();
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let n = indices.len().max(1) as f64;
    for s in &mut sum {
        *s /= n;
    }
    sum
}

/// Converts an `f64` centroid back to `T`, saturating to `T::zero()` on failure (never happens for
/// the finite, in-range values this module produces).
pub(super) fn to_element_type<T: Number>(values: &[f64]) -> Vec<T> {
    values.iter().map(|&v| T::from_f64(v).unwrap_or_else(T::zero)).collect()
}

/// Mean and max distance from `pivot_t` to every member of `indices`.
fn spread<T: Number>(indices: &[usize], dataset: &Dataset<'_, T>, pivot_t: &[T], distance: &Distance) -> (f64, f64)
where
    Distance: Metric<T>,
{
    if indices.is_empty() {
        return (0.0, 0.0);
    }
    let mut sum = 0.0;
    let mut max = 0.0_f64;
    for &idx in indices {
        let d = Metric::<T>::full(distance, pivot_t, dataset.row(idx));
        sum += d;
        max = max.max(d);
    }
    #[allow(clippy::cast_precision_loss)]
    let n = indices.len() as f64;
    (sum / n, max)
}

/// Seeds `config.branching` initial centers per `config.centers_init`. Returns `None` if the
/// configuration degenerates (fewer than `branching` distinct centers could be found), signalling
/// the caller to collapse this node to a leaf instead (§4.5 step 3).
fn seed_centers<T: Number>(indices: &[usize], dataset: &Dataset<'_, T>, config: &Config, rng: &mut RandomSource, distance: &Distance) -> Option<Vec<Vec<f64>>>
where
    Distance: Metric<T>,
{
    let wanted = config.branching;
    if indices.len() < wanted {
        return None;
    }

    let mut centers: Vec<Vec<f64>> = Vec::with_capacity(wanted);

    match config.centers_init {
        CentersInit::Random => {
            let chosen = rng.choose_unique(indices.len(), wanted);
            for slot in chosen {
                centers.push(row_to_f64(dataset, indices[slot]));
            }
        }
        CentersInit::Gonzales => {
            let first = indices[rng.uniform(indices.len())];
            centers.push(row_to_f64(dataset, first));
            while centers.len() < wanted {
                let centers_t: Vec<Vec<T>> = centers.iter().map(|c| to_element_type(c)).collect();
                let farthest = indices
                    .iter()
                    .copied()
                    .max_by(|&a, &b| {
                        let da = nearest_center_dist(dataset.row(a), &centers_t, distance);
                        let db = nearest_center_dist(dataset.row(b), &centers_t, distance);
                        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .unwrap_or(indices[0]);
                centers.push(row_to_f64(dataset, farthest));
            }
        }
        CentersInit::KMeansPlusPlus => {
            let first = indices[rng.uniform(indices.len())];
            centers.push(row_to_f64(dataset, first));
            while centers.len() < wanted {
                let centers_t: Vec<Vec<T>> = centers.iter().map(|c| to_element_type(c)).collect();
                let weights: Vec<f64> = indices
                    .iter()
                    .map(|&idx| {
                        let d = nearest_center_dist(dataset.row(idx), &centers_t, distance);
                        d * d
                    })
                    .collect();
                let slot = rng.weighted_pick(&weights);
                centers.push(row_to_f64(dataset, indices[slot]));
            }
        }
    }

    // Reject duplicate centers: a set of `branching` centers that collapses to fewer distinct
    // points means this node should terminate instead of looping forever.
    let mut distinct: Vec<&Vec<f64>> = Vec::with_capacity(centers.len());
    for c in &centers {
        if !distinct.iter().any(|&d| d == c) {
            distinct.push(c);
        }
    }
    if distinct.len() < wanted {
        return None;
    }

    Some(centers)
}

fn row_to_f64<T: Number>(dataset: &Dataset<'_, T>, idx: usize) -> Vec<f64> {
    dataset.row(idx).iter().map(Number::as_f64).collect()
}

fn nearest_center_dist<T: Number>(point: &[T], centers_t: &[Vec<T>], distance: &Distance) -> f64
where
    Distance: Metric<T>,
{
    centers_t
        .iter()
        .map(|c| Metric::<T>::full(distance, point, c))
        .fold(f64::INFINITY, f64::min)
}

/// Runs Lloyd's iterations to convergence (or `config.iterations`, `0` meaning unbounded),
/// returning each `indices` slot's assigned cluster in `0..config.branching` (§4.5 step 4).
fn lloyd<T: Number>(indices: &[usize], dataset: &Dataset<'_, T>, mut centers: Vec<Vec<f64>>, config: &Config, distance: &Distance) -> Vec<usize>
where
    Distance: Metric<T>,
{
    let cols = dataset.cols();
    let mut assignments = vec![usize::MAX; indices.len()];
    let max_iter = if config.iterations == 0 { usize::MAX } else { config.iterations };

    for _ in 0..max_iter {
        let centers_t: Vec<Vec<T>> = centers.iter().map(|c| to_element_type(c)).collect();
        let mut changed = false;

        for (slot, &point_idx) in indices.iter().enumerate() {
            let row = dataset.row(point_idx);
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (c, center) in centers_t.iter().enumerate() {
                let d = Metric::<T>::full(distance, row, center);
                if d < best_dist {
                    best_dist = d;
                    best = c;
                }
            }
            if assignments[slot] != best {
                changed = true;
                assignments[slot] = best;
            }
        }

        let mut sums = vec![vec![0.0_f64; cols]; config.branching];
        let mut counts = vec![0usize; config.branching];
        for (slot, &point_idx) in indices.iter().enumerate() {
            let c = assignments[slot];
            counts[c] += 1;
            for (d, &value) in dataset.row(point_idx).iter().enumerate() {
                sums[c][d] += value.as_f64();
            }
        }

        for c in 0..config.branching {
            if counts[c] == 0 {
                // Empty cluster: steal one point from the most populous cluster (§4.5 step 4).
                let Some((donor, _)) = counts.iter().enumerate().max_by_key(|&(_, &n)| n) else {
                    continue;
                };
                if donor == c || counts[donor] == 0 {
                    continue;
                }
                if let Some(slot) = indices.iter().enumerate().position(|(s, _)| assignments[s] == donor) {
                    assignments[slot] = c;
                    counts[donor] -= 1;
                    counts[c] += 1;
                    let point_idx = indices[slot];
                    for (d, &value) in dataset.row(point_idx).iter().enumerate() {
                        sums[donor][d] -= value.as_f64();
                        sums[c][d] += value.as_f64();
                    }
                    changed = true;
                }
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let n = counts[c] as f64;
            for d in 0..cols {
                centers[c][d] = sums[c][d] / n;
            }
        }

        if !changed {
            break;
        }
    }

    assignments
}
