//! k-d tree node representation (§3 "KD tree node").

use crate::arena::NodeId;

/// A node in one tree of the randomized forest.
///
/// Subtrees are owned by the tree's [`crate::arena::Arena`]; a node only ever references its
/// children by handle, never by parent pointer (§9 "Cyclic/parent references").
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Node {
    /// `left` covers points with `coord[cut_dim] < cut_value`; `right` covers the rest. Duplicates
    /// on the cut value may straddle either side depending on how the split was computed.
    Internal {
        /// The dimension the split was made on.
        cut_dim: usize,
        /// The split threshold along `cut_dim`.
        cut_value: f64,
        /// Handle to the left child.
        left: NodeId,
        /// Handle to the right child.
        right: NodeId,
    },
    /// A single-point leaf, per the classic randomized k-d tree variant.
    Leaf {
        /// The row id of the point stored at this leaf.
        point_id: usize,
    },
}
