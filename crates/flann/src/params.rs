//! Typed configuration, replacing the string-keyed parameter bag of the original design (§6, §9
//! "Global state").

use flann_distances::Distance;

use crate::error::{FlannError, Result};

/// How a k-means node's initial `branching` centers are seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CentersInit {
    /// Pick `branching` distinct points uniformly at random.
    Random,
    /// Gonzales farthest-point seeding: each new center is the point farthest from the current
    /// set.
    Gonzales,
    /// k-means++: each new center is picked with probability proportional to its squared distance
    /// to the nearest already-chosen center.
    KMeansPlusPlus,
}

/// The search-budget knobs that apply uniformly across index variants (§6 "Parameters bag").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// Maximum number of leaf/data-point distance evaluations, or `None` for unlimited (exact)
    /// traversal.
    pub checks: Option<usize>,
    /// Relative slack applied to pruning bounds; `0.0` is the tightest (still-approximate w.r.t.
    /// the forest) setting.
    pub eps: f64,
    /// Whether radius-search results must be returned sorted by distance.
    pub sorted: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            checks: Some(32),
            eps: 0.0,
            sorted: true,
        }
    }
}

impl SearchParams {
    /// Validates domain constraints (`eps >= 0`).
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::InvalidParam`] if `eps < 0.0`.
    pub fn validate(&self) -> Result<()> {
        if self.eps < 0.0 {
            return Err(FlannError::InvalidParam {
                name: "eps",
                reason: "must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Selects which index variant to build and its construction-time knobs (§6 "Parameters bag",
/// §9 "Polymorphism").
#[derive(Debug, Clone, PartialEq)]
pub enum IndexParams {
    /// Exhaustive linear scan; the ground-truth oracle and fallback for tiny datasets.
    Linear,
    /// A randomized k-d forest.
    KdForest {
        /// Number of randomized trees.
        trees: usize,
    },
    /// A hierarchical k-means tree.
    KMeans {
        /// Number of children per internal node.
        branching: usize,
        /// Lloyd-iteration cap; `0` means iterate to convergence.
        iterations: usize,
        /// Center-seeding strategy.
        centers_init: CentersInit,
        /// Cluster-boundary traversal bias.
        cb_index: f64,
    },
    /// The union of a k-d forest and a k-means tree.
    Composite {
        /// Number of randomized trees in the forest half.
        trees: usize,
        /// Number of children per internal node in the k-means half.
        branching: usize,
        /// Lloyd-iteration cap for the k-means half.
        iterations: usize,
        /// Center-seeding strategy for the k-means half.
        centers_init: CentersInit,
        /// Cluster-boundary traversal bias for the k-means half.
        cb_index: f64,
    },
    /// Grid-search across the above for the cheapest configuration meeting a target precision.
    Autotuned {
        /// Minimum acceptable recall against exact (linear-scan) ground truth.
        target_precision: f64,
        /// Weight applied to build time in the autotuner's cost function.
        build_weight: f64,
        /// Weight applied to memory overhead in the autotuner's cost function.
        memory_weight: f64,
        /// Fraction of the dataset sampled for grid search.
        sample_fraction: f64,
    },
}

impl IndexParams {
    /// A k-d forest with the classic default of 4 trees.
    #[must_use]
    pub fn kdtree() -> Self {
        Self::KdForest { trees: 4 }
    }

    /// A k-means tree with commonly-used defaults.
    #[must_use]
    pub fn kmeans() -> Self {
        Self::KMeans {
            branching: 32,
            iterations: 11,
            centers_init: CentersInit::KMeansPlusPlus,
            cb_index: 0.2,
        }
    }

    /// Validates domain constraints and compatibility with `distance`'s capability flags.
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::InvalidParam`] if a numeric field is out of domain, or if a k-d
    /// forest is paired with a distance that is not dimensionwise-additive.
    pub fn validate<T>(&self, distance: &Distance) -> Result<()>
    where
        Distance: flann_distances::Metric<T>,
    {
        use flann_distances::Metric;

        let caps = Metric::<T>::capabilities(distance);
        match self {
            Self::Linear => Ok(()),
            Self::KdForest { trees } => {
                if *trees < 1 {
                    return Err(FlannError::InvalidParam {
                        name: "trees",
                        reason: "must be at least 1".to_string(),
                    });
                }
                if !caps.dimensionwise_additive {
                    return Err(FlannError::InvalidParam {
                        name: "algorithm",
                        reason: "kdtree requires a dimensionwise-additive distance".to_string(),
                    });
                }
                Ok(())
            }
            Self::KMeans { branching, cb_index, .. } => {
                Self::validate_kmeans_fields(*branching, *cb_index)?;
                if !caps.vector_space_metric {
                    return Err(FlannError::InvalidParam {
                        name: "algorithm",
                        reason: "kmeans requires a vector-space-metric distance".to_string(),
                    });
                }
                Ok(())
            }
            Self::Composite {
                trees, branching, cb_index, ..
            } => {
                if *trees < 1 {
                    return Err(FlannError::InvalidParam {
                        name: "trees",
                        reason: "must be at least 1".to_string(),
                    });
                }
                Self::validate_kmeans_fields(*branching, *cb_index)?;
                if !caps.dimensionwise_additive || !caps.vector_space_metric {
                    return Err(FlannError::InvalidParam {
                        name: "algorithm",
                        reason: "composite requires a distance that is both dimensionwise-additive and a vector-space-metric".to_string(),
                    });
                }
                Ok(())
            }
            Self::Autotuned {
                target_precision,
                build_weight,
                memory_weight,
                sample_fraction,
            } => {
                if !(0.0..=1.0).contains(target_precision) || *target_precision <= 0.0 {
                    return Err(FlannError::InvalidParam {
                        name: "target_precision",
                        reason: "must be in (0, 1]".to_string(),
                    });
                }
                if *build_weight < 0.0 || *memory_weight < 0.0 {
                    return Err(FlannError::InvalidParam {
                        name: "build_weight/memory_weight",
                        reason: "must be non-negative".to_string(),
                    });
                }
                if !(0.0..=1.0).contains(sample_fraction) || *sample_fraction <= 0.0 {
                    return Err(FlannError::InvalidParam {
                        name: "sample_fraction",
                        reason: "must be in (0, 1]".to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    pub(crate) fn validate_kmeans_fields(branching: usize, cb_index: f64) -> Result<()> {
        if branching < 2 {
            return Err(FlannError::InvalidParam {
                name: "branching",
                reason: "must be at least 2".to_string(),
            });
        }
        if cb_index < 0.0 {
            return Err(FlannError::InvalidParam {
                name: "cb_index",
                reason: "must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}
