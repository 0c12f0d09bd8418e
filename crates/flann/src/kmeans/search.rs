//! Best-bin-first and exact traversal for the hierarchical k-means tree (§4.5 "Search").

use flann_distances::{Distance, Metric, Number};

use crate::arena::NodeId;
use crate::branch::BranchHeap;
use crate::dataset::Dataset;
use crate::params::SearchParams;
use crate::result_set::ResultSet;

use super::build::to_element_type;
use super::node::{Node, NodeKind};
use super::KMeansTree;

impl KMeansTree {
    /// Best-bin-first traversal: descend into the nearest child at each level, deferring the
    /// rest with a cluster-boundary-biased priority (§4.5 "Search").
    pub(crate) fn drive<T: Number>(&self, dataset: &Dataset<'_, T>, query: &[T], params: &SearchParams, result: &mut ResultSet)
    where
        Distance: Metric<T>,
    {
        let max_checks = params.checks.unwrap_or(usize::MAX);
        let mut heap: BranchHeap<NodeId> = BranchHeap::new();
        let mut checks = 0usize;

        self.descend_best_bin(self.root, dataset, query, params, &mut heap, result, &mut checks);

        while !(checks >= max_checks && result.full()) {
            let Some(branch) = heap.pop_min() else { break };
            if branch.lower_bound / (1.0 + params.eps) >= result.worst() {
                continue;
            }
            self.descend_best_bin(branch.node, dataset, query, params, &mut heap, result, &mut checks);
        }
    }

    fn descend_best_bin<T: Number>(
        &self,
        node_id: NodeId,
        dataset: &Dataset<'_, T>,
        query: &[T],
        params: &SearchParams,
        heap: &mut BranchHeap<NodeId>,
        result: &mut ResultSet,
        checks: &mut usize,
    ) where
        Distance: Metric<T>,
    {
        match &self.arena.get(node_id).kind {
            NodeKind::Leaf { point_ids } => {
                for &point_id in point_ids {
                    if dataset.is_removed(point_id) {
                        continue;
                    }
                    let d = Metric::<T>::full(&self.distance, query, dataset.row(point_id));
                    result.add(d, point_id);
                    *checks += 1;
                    if *checks >= params.checks.unwrap_or(usize::MAX) && result.full() {
                        return;
                    }
                }
            }
            NodeKind::Internal { children } => {
                let distances: Vec<f64> = children
                    .iter()
                    .map(|&child| {
                        let pivot_t = to_element_type::<T>(&self.arena.get(child).pivot);
                        Metric::<T>::full(&self.distance, query, &pivot_t)
                    })
                    .collect();

                let Some(nearest_slot) = distances
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(slot, _)| slot)
                else {
                    return;
                };

                for (slot, &child) in children.iter().enumerate() {
                    if slot == nearest_slot {
                        continue;
                    }
                    let variance = self.arena.get(child).variance;
                    let priority = distances[slot] - self.cb_index * variance;
                    heap.insert(child, priority);
                }

                self.descend_best_bin(children[nearest_slot], dataset, query, params, heap, result, checks);
            }
        }
    }

    /// Exhaustive traversal pruning subtrees with the triangle inequality, for verification paths
    /// that need exact results rather than an approximate best-bin-first cutoff (§4.5 "Exact
    /// traversal").
    pub(crate) fn drive_exact<T: Number>(&self, dataset: &Dataset<'_, T>, query: &[T], result: &mut ResultSet)
    where
        Distance: Metric<T>,
    {
        self.descend_exact(self.root, dataset, query, result);
    }

    fn descend_exact<T: Number>(&self, node_id: NodeId, dataset: &Dataset<'_, T>, query: &[T], result: &mut ResultSet)
    where
        Distance: Metric<T>,
    {
        let node = self.arena.get(node_id);
        match &node.kind {
            NodeKind::Leaf { point_ids } => {
                for &point_id in point_ids {
                    if dataset.is_removed(point_id) {
                        continue;
                    }
                    let d = Metric::<T>::full(&self.distance, query, dataset.row(point_id));
                    result.add(d, point_id);
                }
            }
            NodeKind::Internal { children } => {
                let mut ordered: Vec<(NodeId, f64)> = children
                    .iter()
                    .map(|&child| {
                        let pivot_t = to_element_type::<T>(&self.arena.get(child).pivot);
                        (child, Metric::<T>::full(&self.distance, query, &pivot_t))
                    })
                    .collect();
                ordered.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

                for (child, b) in ordered {
                    let r = self.arena.get(child).radius;
                    let w = result.worst();
                    if !triangle_prune(b, r, w) {
                        self.descend_exact(child, dataset, query, result);
                    }
                }
            }
        }
    }
}

/// `true` if the subtree rooted at a child with pivot-distance `b` and radius `r` cannot possibly
/// improve on the current worst distance `w`, per the sign-aware quadratic test (§4.5 "Exact
/// traversal").
fn triangle_prune(b: f64, r: f64, w: f64) -> bool {
    if !w.is_finite() {
        return false;
    }
    let t = b - r - w;
    t > 0.0 && t * t - 4.0 * r * w > 0.0
}
