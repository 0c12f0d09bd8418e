//! Hierarchical k-means tree node representation (§4.5 "Build", step 1).

use crate::arena::NodeId;

/// A node's cluster statistics, computed once at build time and reused at search time for
/// cluster-boundary biasing and triangle-inequality pruning.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Arithmetic mean of every point in this node's subtree, in element-wise `f64`.
    pub(super) pivot: Vec<f64>,
    /// Mean distance (in the configured metric's native units, e.g. squared for `SquaredL2`) from
    /// `pivot` to each member; used as the cluster-boundary bias term.
    pub(super) variance: f64,
    /// Maximum distance from `pivot` to any member; used for triangle-inequality pruning.
    pub(super) radius: f64,
    /// The node's children, or its stored point ids if it is a leaf.
    pub(super) kind: NodeKind,
}

/// Whether a node branches further or terminates the recursion.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum NodeKind {
    /// An internal node with `branching` (or fewer, after degenerate collapse) children.
    Internal {
        /// Handles to the child nodes, in no particular order.
        children: Vec<NodeId>,
    },
    /// A leaf storing every point id assigned to this cluster, sorted ascending (§4.5 step 2).
    Leaf {
        /// Row ids of the points held at this leaf.
        point_ids: Vec<usize>,
    },
}
