//! Algebraic capability flags that gate which pruning strategies an index may use.

/// Capability flags advertised by a [`crate::Distance`](crate::Distance).
///
/// An index consults these flags once, at build time, to decide which pruning strategy it is
/// allowed to use; neither flag is ever re-derived per query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// `D(a, b) = sum_i accum(a_i, b_i)`.
    ///
    /// Required for k-d-tree partial-distance (single-axis) pruning: the contribution of one
    /// coordinate to the bound must be computable in isolation from the others.
    pub dimensionwise_additive: bool,
    /// Satisfies the triangle inequality: `D(a, c) <= D(a, b) + D(b, c)`.
    ///
    /// Required for k-means-tree ball pruning, which bounds the distance from a query to any
    /// point in a cluster using only the distance to the cluster's pivot and its radius.
    pub vector_space_metric: bool,
}

impl Capabilities {
    /// Both pruning strategies are available.
    pub const FULL: Self = Self {
        dimensionwise_additive: true,
        vector_space_metric: true,
    };

    /// Only ball pruning is available; k-d-tree axis pruning must be disabled.
    pub const METRIC_ONLY: Self = Self {
        dimensionwise_additive: false,
        vector_space_metric: true,
    };
}
