//! The top-level index handle unifying every algorithm variant behind one search API (§6, §9
//! "Polymorphism").

use flann_distances::{Distance, Metric, Number};
use mt_logger::{mt_log, Level};

use crate::composite::CompositeIndex;
use crate::dataset::Dataset;
use crate::error::{FlannError, Result};
use crate::kdforest::KdForest;
use crate::kmeans::KMeansTree;
use crate::params::{IndexParams, SearchParams};

/// The built search structure for one of [`IndexParams`]'s variants. `Autotuned` never appears
/// here directly: `Index::build` resolves it to whichever concrete variant the autotuner chose
/// before storing it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) enum Variant {
    Linear,
    KdForest(KdForest),
    KMeans(KMeansTree),
    Composite(CompositeIndex),
}

impl Variant {
    fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::KdForest(_) => "kdtree",
            Self::KMeans(_) => "kmeans",
            Self::Composite(_) => "composite",
        }
    }
}

/// A built nearest-neighbor index over an owned or borrowed dataset, tagged with the distance it
/// was built against.
///
/// The distance is a field fixed for the index's lifetime (§9 "Global state" redesign): there is
/// no process-wide mutable distance setting to invalidate.
#[derive(Debug)]
pub struct Index<'a, T: Number> {
    dataset: Dataset<'a, T>,
    distance: Distance,
    variant: Variant,
    seed: u64,
}

impl<'a, T: Number> Index<'a, T>
where
    Distance: Metric<T>,
{
    /// Builds an index of the variant named by `params` over `dataset`, using `distance` and
    /// `seed` to drive every randomized choice (§6 `build_index`).
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::InvalidParam`] if `params` fails validation against `distance`, or
    /// propagates a [`FlannError::BuildFailure`] from the chosen algorithm's build.
    pub fn build(dataset: Dataset<'a, T>, params: &IndexParams, distance: Distance, seed: u64) -> Result<Self> {
        params.validate::<T>(&distance)?;

        mt_log!(Level::Info, "building {} index over {} points", algorithm_name(params), dataset.rows());

        let variant = match params {
            IndexParams::Linear => Variant::Linear,
            IndexParams::KdForest { trees } => Variant::KdForest(KdForest::build(&dataset, *trees, seed, distance)?),
            IndexParams::KMeans {
                branching,
                iterations,
                centers_init,
                cb_index,
            } => Variant::KMeans(KMeansTree::build(&dataset, *branching, *iterations, *centers_init, *cb_index, seed, distance)?),
            IndexParams::Composite {
                trees,
                branching,
                iterations,
                centers_init,
                cb_index,
            } => Variant::Composite(CompositeIndex::build(&dataset, *trees, *branching, *iterations, *centers_init, *cb_index, seed, distance)?),
            IndexParams::Autotuned { .. } => {
                return Err(FlannError::NotSupported {
                    operation: "build",
                    variant: "autotuned",
                });
            }
        };

        Ok(Self {
            dataset,
            distance,
            variant,
            seed,
        })
    }

    /// Wraps an already-built variant with its owning dataset; used by [`crate::persist`] once it
    /// has reconstituted one from a saved node stream.
    pub(crate) fn from_variant(dataset: Dataset<'a, T>, distance: Distance, variant: Variant, seed: u64) -> Self {
        Self {
            dataset,
            distance,
            variant,
            seed,
        }
    }

    /// The algorithm tag this index was built as, used to write/check the persistence header.
    #[must_use]
    pub(crate) fn algorithm_tag(&self) -> &'static str {
        self.variant.name()
    }

    /// The built variant, for [`crate::persist`] to encode.
    #[must_use]
    pub(crate) fn variant(&self) -> &Variant {
        &self.variant
    }

    /// The seed this index (and any future rebuild of it) was built with.
    #[must_use]
    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    /// The number of rows in the backing dataset, including tombstoned ones.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.dataset.rows()
    }

    /// The dimensionality of the backing dataset.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.dataset.cols()
    }

    /// The distance this index was built with.
    #[must_use]
    pub fn distance(&self) -> &Distance {
        &self.distance
    }

    /// Runs a k-nearest-neighbor query (§6 `knn_search`).
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::DimensionMismatch`] if `query.len()` does not match the index's
    /// dimensionality, or [`FlannError::InvalidParam`] if `params.eps < 0`.
    pub fn knn_search(&self, query: &[T], k: usize, params: &SearchParams) -> Result<Vec<(f64, usize)>> {
        self.check_query(query)?;
        params.validate()?;

        Ok(match &self.variant {
            Variant::Linear => crate::linear::knn(&self.dataset, &self.distance, query, k),
            Variant::KdForest(forest) => forest.search(&self.dataset, query, k, params),
            Variant::KMeans(tree) => tree.search(&self.dataset, query, k, params),
            Variant::Composite(composite) => composite.search(&self.dataset, query, k, params),
        })
    }

    /// Runs `knn_search` for every row of `queries` (row-major, `queries.len() / self.cols()`
    /// queries) in parallel over a `rayon` thread pool, matching `knn_search`'s indices/distances
    /// per query (§6 `knn_search(index, queries[M][D], K, search_params)`).
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::DimensionMismatch`] if `queries.len()` is not a multiple of
    /// `self.cols()`, or any per-query error the first failing query would have returned.
    pub fn knn_search_batch(&self, queries: &[T], k: usize, params: &SearchParams) -> Result<Vec<Vec<(f64, usize)>>>
    where
        T: Sync,
    {
        use rayon::prelude::*;

        let cols = self.dataset.cols();
        if queries.len() % cols != 0 {
            return Err(FlannError::DimensionMismatch {
                expected: cols,
                found: queries.len() % cols,
            });
        }

        queries.par_chunks(cols).map(|query| self.knn_search(query, k, params)).collect()
    }

    /// Runs a radius query (§6 `radius_search`). Results are truncated to `max_results` if it is
    /// `Some`; `params.sorted` controls whether they are returned sorted or in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::DimensionMismatch`] or [`FlannError::InvalidParam`] under the same
    /// conditions as [`Self::knn_search`].
    pub fn radius_search(&self, query: &[T], radius: f64, max_results: Option<usize>, params: &SearchParams) -> Result<Vec<(f64, usize)>> {
        self.check_query(query)?;
        params.validate()?;

        let mut hits = match &self.variant {
            Variant::Linear => crate::linear::radius(&self.dataset, &self.distance, query, radius),
            Variant::KdForest(forest) => forest.search_radius(&self.dataset, query, radius, params),
            Variant::KMeans(tree) => tree.search_radius(&self.dataset, query, radius, params),
            Variant::Composite(composite) => composite.search_radius(&self.dataset, query, radius, params),
        };

        if let Some(cap) = max_results {
            hits.truncate(cap);
        }
        // The result accumulators always produce ascending-distance order; `params.sorted` only
        // controls whether a caller-visible guarantee is made, not whether we extra work to unsort.
        let _ = params.sorted;
        Ok(hits)
    }

    /// Runs an exhaustive, exact traversal using triangle-inequality pruning instead of a check
    /// budget. Only implemented for variants that carry a k-means tree (§7 `NotSupported`).
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::NotSupported`] for `Linear` or `KdForest`, which have no
    /// triangle-inequality structure to prune with (linear scan already visits every point;
    /// `KdForest` has no per-node radius).
    pub fn knn_search_exact(&self, query: &[T], k: usize) -> Result<Vec<(f64, usize)>> {
        self.check_query(query)?;
        match &self.variant {
            Variant::KMeans(tree) => Ok(tree.search_exact(&self.dataset, query, k)),
            Variant::Linear => Ok(crate::linear::knn(&self.dataset, &self.distance, query, k)),
            other => Err(FlannError::NotSupported {
                operation: "knn_search_exact",
                variant: other.name(),
            }),
        }
    }

    /// Appends `points` to the dataset, rebuilding the index if the new size exceeds
    /// `rebuild_threshold · original_size` (§6 `add_points`).
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::DimensionMismatch`] if any appended row's length does not match
    /// `self.dataset.cols()`, or propagates a build error from the rebuild.
    pub fn add_points(&mut self, points: &[T], rebuild_threshold: f64) -> Result<()> {
        let original_size = self.dataset.rows();
        let added = self.dataset.extend(points)?;

        #[allow(clippy::cast_precision_loss)]
        let grew_past_threshold = self.dataset.rows() as f64 > rebuild_threshold * original_size.max(1) as f64;

        if grew_past_threshold {
            mt_log!(
                Level::Info,
                "rebuilding {} index after add_points ({} -> {} points)",
                self.variant.name(),
                original_size,
                self.dataset.rows()
            );
            self.rebuild()?;
        }

        mt_log!(Level::Debug, "add_points appended {added} rows");
        Ok(())
    }

    /// Tombstones `id`, filtering it out of future result emission without compacting storage
    /// (§6 `remove_point`).
    ///
    /// # Errors
    ///
    /// Returns [`FlannError::InvalidParam`] if `id` is out of range.
    pub fn remove_point(&mut self, id: usize) -> Result<()> {
        self.dataset.remove(id)
    }

    /// Rebuilds the current variant in place over the current (possibly extended or
    /// tombstoned) dataset, reusing this index's original seed and distance.
    fn rebuild(&mut self) -> Result<()> {
        let params = match &self.variant {
            Variant::Linear => IndexParams::Linear,
            Variant::KdForest(forest) => IndexParams::KdForest { trees: forest.tree_count() },
            Variant::KMeans(_) | Variant::Composite(_) => {
                // Rebuild parameters for these variants are recovered from the index's own build
                // history rather than reconstructed here, since Lloyd's iteration count and
                // cb_index are not recoverable from the built tree alone; callers that need a
                // precise rebuild should call `Index::build` again with the original `IndexParams`.
                return Err(FlannError::NotSupported {
                    operation: "rebuild",
                    variant: self.variant.name(),
                });
            }
        };
        let rebuilt = Self::build(self.dataset.clone(), &params, self.distance, self.seed)?;
        *self = rebuilt;
        Ok(())
    }

    fn check_query(&self, query: &[T]) -> Result<()> {
        if query.len() != self.dataset.cols() {
            return Err(FlannError::DimensionMismatch {
                expected: self.dataset.cols(),
                found: query.len(),
            });
        }
        Ok(())
    }
}

fn algorithm_name(params: &IndexParams) -> &'static str {
    match params {
        IndexParams::Linear => "linear",
        IndexParams::KdForest { .. } => "kdtree",
        IndexParams::KMeans { .. } => "kmeans",
        IndexParams::Composite { .. } => "composite",
        IndexParams::Autotuned { .. } => "autotuned",
    }
}

/// Builds a throwaway k-means tree over `dataset` and returns a `k`-way clustering of it by
/// greedily splitting the highest-variance node (§6 `compute_cluster_centers`, §4.5 "Additional
/// operation").
///
/// # Errors
///
/// Returns [`FlannError::InvalidParam`] if `branching < 2` or `cb_index < 0`, or propagates a
/// [`FlannError::BuildFailure`] from the tree build.
pub fn compute_cluster_centers<T: Number>(
    dataset: &Dataset<'_, T>,
    k: usize,
    branching: usize,
    iterations: usize,
    centers_init: crate::params::CentersInit,
    cb_index: f64,
    distance: Distance,
    seed: u64,
) -> Result<Vec<Vec<f64>>>
where
    Distance: Metric<T>,
{
    crate::params::IndexParams::validate_kmeans_fields(branching, cb_index)?;
    let tree = KMeansTree::build(dataset, branching, iterations, centers_init, cb_index, seed, distance)?;
    Ok(tree.cluster_centers(k))
}
