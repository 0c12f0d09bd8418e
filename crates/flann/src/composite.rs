//! Composite index: a k-d forest and a k-means tree over the same dataset, queried as a union
//! (§4.6).

use flann_distances::{Distance, Metric, Number};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::kdforest::KdForest;
use crate::kmeans::KMeansTree;
use crate::params::{CentersInit, SearchParams};
use crate::result_set::ResultSet;

/// Holds one k-d forest and one k-means tree over the same dataset. A query runs against both and
/// shares a single result set; there is no scheduling between them, just a union of candidates.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct CompositeIndex {
    forest: KdForest,
    tree: KMeansTree,
}

impl CompositeIndex {
    /// Builds both halves over the same dataset and distance.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::error::FlannError`] from either half's build.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn build<T: Number>(
        dataset: &Dataset<'_, T>,
        trees: usize,
        branching: usize,
        iterations: usize,
        centers_init: CentersInit,
        cb_index: f64,
        seed: u64,
        distance: Distance,
    ) -> Result<Self>
    where
        Distance: Metric<T>,
    {
        let forest = KdForest::build(dataset, trees, seed, distance.clone())?;
        let tree = KMeansTree::build(dataset, branching, iterations, centers_init, cb_index, seed.wrapping_add(1), distance)?;
        Ok(Self { forest, tree })
    }

    /// Runs the query against both halves, merging into one result set (§4.6: "No scheduling
    /// between them; it is a union not a race").
    pub(crate) fn search<T: Number>(&self, dataset: &Dataset<'_, T>, query: &[T], k: usize, params: &SearchParams) -> Vec<(f64, usize)>
    where
        Distance: Metric<T>,
    {
        let mut result = ResultSet::top_k(k);
        self.forest.drive(dataset, query, params, &mut result);
        self.tree.drive(dataset, query, params, &mut result);
        result.into_sorted_vec()
    }

    /// Runs a radius query against both halves, merging into one result set.
    pub(crate) fn search_radius<T: Number>(&self, dataset: &Dataset<'_, T>, query: &[T], radius: f64, params: &SearchParams) -> Vec<(f64, usize)>
    where
        Distance: Metric<T>,
    {
        let mut result = ResultSet::radius(radius);
        self.forest.drive(dataset, query, params, &mut result);
        self.tree.drive(dataset, query, params, &mut result);
        result.into_sorted_vec()
    }
}
