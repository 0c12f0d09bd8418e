//! The shared best-bin-first priority queue of deferred subtrees.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::ord_items::MinItem;

/// A deferred subtree and its lower-bound distance to the query, ordered so that the branch heap
/// pops the smallest lower bound first.
#[derive(Debug, Clone, Copy)]
pub struct Branch<A> {
    /// The subtree this branch defers (a node handle, or a tree index paired with a node handle
    /// for the forest, which shares one heap across all of its trees).
    pub node: A,
    /// A lower bound on the true distance from the query to any point in `node`'s subtree.
    pub lower_bound: f64,
}

/// A min-heap of [`Branch`]es, shared across an entire k-d forest search (or a single k-means
/// tree search), draining in increasing lower-bound order.
///
/// Grounded on the reference workspace's `SizedHeap`, but unbounded: a deferred branch is only
/// ever worth keeping if it might still beat the result set's worst distance, and that check is
/// made at pop time (§4.4, §4.5), not at push time.
#[derive(Debug, Default)]
pub struct BranchHeap<A> {
    heap: BinaryHeap<Reverse<MinItem<A, f64>>>,
}

impl<A> BranchHeap<A> {
    /// An empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new() }
    }

    /// Defers `node` with the given lower bound.
    pub fn insert(&mut self, node: A, lower_bound: f64) {
        self.heap.push(Reverse(MinItem(node, lower_bound)));
    }

    /// Removes and returns the branch with the smallest lower bound, or `None` if empty.
    pub fn pop_min(&mut self) -> Option<Branch<A>> {
        self.heap.pop().map(|Reverse(MinItem(node, lower_bound))| Branch { node, lower_bound })
    }

    /// Discards every deferred branch.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Whether any branch remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of deferred branches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
