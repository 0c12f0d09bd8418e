//! Builds the randomized trees of a [`super::KdForest`] (§4.4 "Build").

use flann_distances::Number;

use crate::arena::{Arena, NodeId};
use crate::dataset::Dataset;
use crate::random::RandomSource;

use super::node::Node;

/// Points sampled per dimension when estimating mean/variance for a split. The original FLANN
/// implementation caps this at 100 regardless of node size, trading a little split quality for a
/// build time independent of node size.
pub(super) const SAMPLE_MEAN: usize = 100;

/// The split dimension is drawn uniformly from the top `RAND_DIM` dimensions by sampled variance,
/// so that a forest of trees disagrees about which axis to split on.
pub(super) const RAND_DIM: usize = 5;

/// Builds one randomized tree over (a random permutation of) every row in `dataset`.
pub(super) fn build_tree<T: Number>(dataset: &Dataset<'_, T>, rng: &mut RandomSource, arena: &mut Arena<Node>) -> NodeId {
    let mut indices: Vec<usize> = (0..dataset.rows()).filter(|&i| !dataset.is_removed(i)).collect();
    rng.shuffle(&mut indices);
    split(&mut indices, dataset, rng, arena)
}

fn split<T: Number>(indices: &mut [usize], dataset: &Dataset<'_, T>, rng: &mut RandomSource, arena: &mut Arena<Node>) -> NodeId {
    if indices.len() == 1 {
        return arena.allocate(Node::Leaf { point_id: indices[0] });
    }

    let cols = dataset.cols();
    let sample_len = indices.len().min(SAMPLE_MEAN);

    let mut means = vec![0.0_f64; cols];
    for &idx in &indices[..sample_len] {
        let row = dataset.row(idx);
        for (d, &value) in row.iter().enumerate() {
            means[d] += value.as_f64();
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let sample_len_f64 = sample_len as f64;
    for mean in &mut means {
        *mean /= sample_len_f64;
    }

    let mut variances = vec![0.0_f64; cols];
    for &idx in &indices[..sample_len] {
        let row = dataset.row(idx);
        for (d, &value) in row.iter().enumerate() {
            let diff = value.as_f64() - means[d];
            variances[d] += diff * diff;
        }
    }

    let mut dims_by_variance: Vec<usize> = (0..cols).collect();
    dims_by_variance.sort_by(|&a, &b| variances[b].partial_cmp(&variances[a]).unwrap_or(std::cmp::Ordering::Equal));
    let top_count = RAND_DIM.min(cols).max(1);
    let cut_dim = dims_by_variance[rng.uniform(top_count)];
    let cut_value = means[cut_dim];

    let mut mid = partition_by_cut(indices, dataset, cut_dim, cut_value);
    if mid == 0 || mid == indices.len() {
        // All sampled points tied on this dimension: fall back to a median split by index so
        // every recursion still makes progress.
        indices.sort_by(|&a, &b| {
            dataset.row(a)[cut_dim]
                .as_f64()
                .partial_cmp(&dataset.row(b)[cut_dim].as_f64())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        mid = indices.len() / 2;
    }

    let (left_indices, right_indices) = indices.split_at_mut(mid);
    let left = split(left_indices, dataset, rng, arena);
    let right = split(right_indices, dataset, rng, arena);

    arena.allocate(Node::Internal {
        cut_dim,
        cut_value,
        left,
        right,
    })
}

/// Partitions `indices` in place so that every index whose `cut_dim` coordinate is `< cut_value`
/// comes first, returning the split point. Two-pointer swap-in-place, in the idiom of the
/// reference workspace's ball-tree pivot partitioning.
fn partition_by_cut<T: Number>(indices: &mut [usize], dataset: &Dataset<'_, T>, cut_dim: usize, cut_value: f64) -> usize {
    let mut left = 0;
    let mut right = indices.len();
    while left < right {
        if dataset.row(indices[left])[cut_dim].as_f64() < cut_value {
            left += 1;
        } else {
            right -= 1;
            indices.swap(left, right);
        }
    }
    left
}
