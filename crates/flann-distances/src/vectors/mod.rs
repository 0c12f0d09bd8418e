//! Concrete distance functions, grouped by family.
//!
//! These are free functions operating directly on slices; [`crate::Distance`] and
//! [`crate::Hamming`] wrap them behind the [`crate::Metric`] trait so index code can be generic
//! over which one is in use.

pub mod hamming;
pub mod histogram;
pub mod lp_norms;

pub use hamming::hamming;
pub use histogram::{chi_squared, hellinger, histogram_intersection, kl_divergence};
pub use lp_norms::{chebyshev, manhattan, minkowski, minkowski_p, squared_euclidean, squared_euclidean_pruned};
