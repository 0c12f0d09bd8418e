//! Fast approximate nearest neighbors: randomized k-d forests, a hierarchical k-means tree, their
//! composite union, and an autotuner that picks between them.
//!
//! ## Algorithm families
//!
//! - [`params::IndexParams::kdtree`]: a forest of randomized k-d trees, searched best-bin-first
//!   with a shared priority queue.
//! - [`params::IndexParams::kmeans`]: a hierarchical k-means tree with cluster-boundary-biased
//!   traversal, plus an exact triangle-inequality-pruned mode.
//! - `Composite`: both of the above over the same dataset, queried as a union.
//! - [`autotune::autotune`]: grid search over the above for the cheapest configuration meeting a
//!   target precision.
//!
//! Distances are supplied as [`flann_distances::Distance`] values; the element type `T` is any
//! [`flann_distances::Number`].

mod arena;
pub mod autotune;
mod branch;
mod composite;
pub mod dataset;
pub mod error;
mod index;
mod kdforest;
mod kmeans;
mod linear;
mod ord_items;
pub mod params;
pub mod persist;
mod random;
mod result_set;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dataset::Dataset;
pub use error::{FlannError, Result};
pub use index::{compute_cluster_centers, Index};
pub use params::{CentersInit, IndexParams, SearchParams};
pub use persist::{load_index, save_index};

pub use flann_distances::{Distance, Metric, Number};
