//! Best-bin-first search across a shared heap of every tree in the forest (§4.4 "Search").

use bitvec::vec::BitVec;
use flann_distances::{Distance, Metric, Number};

use crate::branch::BranchHeap;
use crate::dataset::Dataset;
use crate::params::SearchParams;
use crate::result_set::ResultSet;

use super::node::Node;
use super::KdForest;

impl KdForest {
    /// Runs one query for its `k` nearest neighbours against every tree, sharing a single
    /// best-bin-first heap and result set. `params.checks` bounds the number of leaf distance
    /// evaluations, independent of `k`.
    pub(crate) fn search<T: Number>(&self, dataset: &Dataset<'_, T>, query: &[T], k: usize, params: &SearchParams) -> Vec<(f64, usize)>
    where
        Distance: Metric<T>,
    {
        let mut result = ResultSet::top_k(k);
        self.drive(dataset, query, params, &mut result);
        result.into_sorted_vec()
    }

    /// Runs one radius query, accepting every point within `radius` across every tree.
    pub(crate) fn search_radius<T: Number>(&self, dataset: &Dataset<'_, T>, query: &[T], radius: f64, params: &SearchParams) -> Vec<(f64, usize)>
    where
        Distance: Metric<T>,
    {
        let mut result = ResultSet::radius(radius);
        self.drive(dataset, query, params, &mut result);
        result.into_sorted_vec()
    }

    /// Shared traversal loop used by both `knn` search (bounded result set) and radius search
    /// (unbounded, radius-capped result set).
    pub(crate) fn drive<T: Number>(&self, dataset: &Dataset<'_, T>, query: &[T], params: &SearchParams, result: &mut ResultSet)
    where
        Distance: Metric<T>,
    {
        let max_checks = params.checks.unwrap_or(usize::MAX);
        let mut checked: BitVec = BitVec::repeat(false, dataset.rows());
        let mut heap: BranchHeap<(usize, crate::arena::NodeId)> = BranchHeap::new();
        let mut checks = 0usize;

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            self.descend(tree_idx, tree.root, 0.0, dataset, query, params, &mut heap, &mut checked, result, &mut checks);
        }

        while !(checks >= max_checks && result.full()) {
            let Some(branch) = heap.pop_min() else { break };
            if branch.lower_bound / (1.0 + params.eps) >= result.worst() {
                continue;
            }
            let (tree_idx, node) = branch.node;
            self.descend(tree_idx, node, branch.lower_bound, dataset, query, params, &mut heap, &mut checked, result, &mut checks);
        }
    }

    /// Descends from `node` to a leaf, deferring each not-taken sibling onto `heap` with a lower
    /// bound equal to the accumulated bound at this node plus that one axis's contribution
    /// (§4.4: "lower bound = parent-lb + accum_dist(...)").
    #[allow(clippy::too_many_arguments)]
    fn descend<T: Number>(
        &self,
        tree_idx: usize,
        mut node: crate::arena::NodeId,
        acc_lb: f64,
        dataset: &Dataset<'_, T>,
        query: &[T],
        params: &SearchParams,
        heap: &mut BranchHeap<(usize, crate::arena::NodeId)>,
        checked: &mut BitVec,
        result: &mut ResultSet,
        checks: &mut usize,
    ) where
        Distance: Metric<T>,
    {
        let tree = &self.trees[tree_idx];
        loop {
            match tree.arena.get(node) {
                Node::Leaf { point_id } => {
                    let point_id = *point_id;
                    if !dataset.is_removed(point_id) && !checked.replace(point_id, true) {
                        let d = self.distance.full(query, dataset.row(point_id));
                        result.add(d, point_id);
                        *checks += 1;
                    }
                    return;
                }
                Node::Internal {
                    cut_dim,
                    cut_value,
                    left,
                    right,
                } => {
                    let coord = query[*cut_dim].as_f64();
                    let axis_gap = self.distance.accum(query[*cut_dim], num_from_f64::<T>(*cut_value));
                    let (near, far) = if coord < *cut_value { (*left, *right) } else { (*right, *left) };

                    let far_bound = acc_lb + axis_gap;
                    if far_bound / (1.0 + params.eps) < result.worst() {
                        heap.insert((tree_idx, far), far_bound);
                    }
                    // `acc_lb` carries forward unchanged into the nearer child: no bound
                    // violation is assumed on that side until a leaf or another split says
                    // otherwise.
                    node = near;
                }
            }
        }
    }
}

/// Converts an `f64` split value back to the element type for feeding through `Distance::accum`,
/// which expects both operands in `T`. Saturates to `T::zero()` if the conversion fails (it never
/// does for the finite, in-range values produced by `build_tree`'s mean computation).
fn num_from_f64<T: Number>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::zero)
}
