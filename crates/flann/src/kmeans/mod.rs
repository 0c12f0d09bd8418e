//! Hierarchical k-means tree: a single tree whose internal nodes are k-means clusters, searched
//! best-bin-first with a cluster-boundary bias, or exhaustively with triangle-inequality pruning
//! (§4.5).

mod build;
mod node;
mod search;

use flann_distances::{Distance, Metric};

use crate::arena::{Arena, NodeId};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::params::{CentersInit, SearchParams};
use crate::random::RandomSource;
use crate::result_set::ResultSet;

use build::Config;
use node::{Node, NodeKind};

/// A single hierarchical k-means tree over the dataset.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct KMeansTree {
    arena: Arena<Node>,
    root: NodeId,
    distance: Distance,
    cb_index: f64,
}

impl KMeansTree {
    /// Builds a k-means tree with the given construction knobs (§4.5 "Build").
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FlannError::BuildFailure`] if the dataset has no live rows.
    pub(crate) fn build<T: flann_distances::Number>(
        dataset: &Dataset<'_, T>,
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
        if dataset.live_count() == 0 {
            return Err(crate::error::FlannError::BuildFailure {
                reason: "cannot build a k-means tree over an empty dataset".to_string(),
            });
        }

        let config = Config {
            branching,
            iterations,
            centers_init,
            cb_index,
        };
        let mut rng = RandomSource::seeded(seed);
        let mut arena = Arena::new(0);
        let root = build::build_tree(dataset, &config, &mut rng, &mut arena, &distance);

        Ok(Self {
            arena,
            root,
            distance,
            cb_index,
        })
    }

    /// Runs one best-bin-first query for its `k` nearest neighbours.
    pub(crate) fn search<T: flann_distances::Number>(&self, dataset: &Dataset<'_, T>, query: &[T], k: usize, params: &SearchParams) -> Vec<(f64, usize)>
    where
        Distance: Metric<T>,
    {
        let mut result = ResultSet::top_k(k);
        self.drive(dataset, query, params, &mut result);
        result.into_sorted_vec()
    }

    /// Runs one best-bin-first radius query.
    pub(crate) fn search_radius<T: flann_distances::Number>(&self, dataset: &Dataset<'_, T>, query: &[T], radius: f64, params: &SearchParams) -> Vec<(f64, usize)>
    where
        Distance: Metric<T>,
    {
        let mut result = ResultSet::radius(radius);
        self.drive(dataset, query, params, &mut result);
        result.into_sorted_vec()
    }

    /// Runs an exhaustive, exact-for-this-tree query using triangle-inequality pruning instead of
    /// a fixed check budget (§4.5 "Exact traversal").
    pub(crate) fn search_exact<T: flann_distances::Number>(&self, dataset: &Dataset<'_, T>, query: &[T], k: usize) -> Vec<(f64, usize)>
    where
        Distance: Metric<T>,
    {
        let mut result = ResultSet::top_k(k);
        self.drive_exact(dataset, query, &mut result);
        result.into_sorted_vec()
    }

    /// Greedily splits the node whose children reduce total intra-cluster variance the most,
    /// repeating until `k` leaves are produced or no internal node remains to split, returning
    /// each resulting cluster's centroid (§4.5 "Additional operation").
    #[must_use]
    pub(crate) fn cluster_centers(&self, k: usize) -> Vec<Vec<f64>> {
        if k == 0 {
            return Vec::new();
        }

        let mut frontier: Vec<NodeId> = vec![self.root];

        loop {
            if frontier.len() >= k {
                break;
            }
            let Some((slot, _)) = frontier
                .iter()
                .enumerate()
                .filter(|&(_, &id)| matches!(self.arena.get(id).kind, NodeKind::Internal { .. }))
                .max_by(|a, b| {
                    let va = self.arena.get(*a.1).variance;
                    let vb = self.arena.get(*b.1).variance;
                    va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
                })
            else {
                break;
            };

            let splittable = frontier[slot];
            let NodeKind::Internal { children } = &self.arena.get(splittable).kind else {
                unreachable!("filtered to internal nodes above")
            };
            let children = children.clone();
            frontier.remove(slot);
            frontier.extend(children);
        }

        frontier.into_iter().map(|id| self.arena.get(id).pivot.clone()).collect()
    }
}
