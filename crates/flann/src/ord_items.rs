//! Ordering wrappers that compare by a payload's second field only.
//!
//! `BinaryHeap` is a max-heap; these let the same heap type serve as either a min-heap
//! ([`MinItem`], by wrapping in `Reverse`-like fashion) or an explicit max-heap ([`MaxItem`]) over
//! an arbitrary associated value `A` that plays no part in ordering.

use std::cmp::Ordering;

/// Orders by `.1` ascending when used as `Reverse<MinItem<A, T>>`, or descending (a max-heap) when
/// pushed directly onto a `BinaryHeap`. [`crate::branch::BranchHeap`] and
/// [`crate::result_set::ResultSet`] both push the `Reverse` form so that `BinaryHeap::pop` yields
/// the smallest distance.
#[derive(Debug, Clone, Copy)]
pub struct MinItem<A, T>(pub A, pub T);

impl<A, T: PartialEq> PartialEq for MinItem<A, T> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl<A, T: PartialEq> Eq for MinItem<A, T> {}

impl<A, T: PartialOrd> PartialOrd for MinItem<A, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.1.partial_cmp(&other.1)
    }
}

impl<A, T: PartialOrd> Ord for MinItem<A, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

/// Orders by `.1` ascending, for use directly on a `BinaryHeap` to get max-first semantics (e.g.
/// "farthest point so far" when seeding k-means centers).
#[derive(Debug, Clone, Copy)]
pub struct MaxItem<A, T>(pub A, pub T);

impl<A, T: PartialEq> PartialEq for MaxItem<A, T> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl<A, T: PartialEq> Eq for MaxItem<A, T> {}

impl<A, T: PartialOrd> PartialOrd for MaxItem<A, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.1.partial_cmp(&other.1)
    }
}

impl<A, T: PartialOrd> Ord for MaxItem<A, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}
