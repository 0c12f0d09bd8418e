//! Randomized k-d forest: a set of k-d trees over the same dataset, built on independently
//! randomized dimension/pivot choices and searched with one shared best-bin-first heap (§4.4).

mod build;
mod node;
mod search;

use flann_distances::Distance;

use crate::arena::{Arena, NodeId};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::random::RandomSource;

use node::Node;

/// One randomized tree: an arena of [`Node`]s plus the handle of its root.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Tree {
    arena: Arena<Node>,
    root: NodeId,
}

/// A forest of randomized k-d trees sharing one distance functor, searched jointly.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct KdForest {
    trees: Vec<Tree>,
    distance: Distance,
}

impl KdForest {
    /// Builds `tree_count` independently randomized trees over every live row of `dataset`.
    ///
    /// Each tree draws from its own [`RandomSource`], derived from `seed` and the tree's index, so
    /// that trees disagree about split dimensions and pivots even over the same data (§4.4
    /// "multiple randomized trees").
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FlannError::InvalidParam`] if `tree_count` is zero, or
    /// [`crate::error::FlannError::BuildFailure`] if `dataset` has no live rows.
    pub(crate) fn build<T: flann_distances::Number>(dataset: &Dataset<'_, T>, tree_count: usize, seed: u64, distance: Distance) -> Result<Self> {
        if tree_count == 0 {
            return Err(crate::error::FlannError::InvalidParam {
                name: "trees",
                reason: "must be at least 1".to_string(),
            });
        }
        if dataset.live_count() == 0 {
            return Err(crate::error::FlannError::BuildFailure {
                reason: "cannot build a k-d forest over an empty dataset".to_string(),
            });
        }

        let trees = (0..tree_count)
            .map(|tree_idx| {
                let mut rng = RandomSource::seeded(seed.wrapping_add(tree_idx as u64));
                let mut arena = Arena::new(0);
                let root = build::build_tree(dataset, &mut rng, &mut arena);
                Tree { arena, root }
            })
            .collect();

        Ok(Self { trees, distance })
    }

    /// Number of trees in the forest.
    #[must_use]
    pub(crate) fn tree_count(&self) -> usize {
        self.trees.len()
    }
}
