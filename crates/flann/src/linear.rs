//! Exhaustive linear scan: the ground-truth oracle and the fallback for tiny datasets (§4's
//! implicit baseline, §4.7 "Compute ground truth for the test set via linear scan").

use flann_distances::{Distance, Metric, Number};

use crate::dataset::Dataset;
use crate::result_set::ResultSet;

/// Scans every live row, returning the `k` nearest to `query`.
pub(crate) fn knn<T: Number>(dataset: &Dataset<'_, T>, distance: &Distance, query: &[T], k: usize) -> Vec<(f64, usize)>
where
    Distance: Metric<T>,
{
    let mut result = ResultSet::top_k(k);
    scan(dataset, distance, query, &mut result);
    result.into_sorted_vec()
}

/// Scans every live row, returning every one within `radius`.
pub(crate) fn radius<T: Number>(dataset: &Dataset<'_, T>, distance: &Distance, query: &[T], radius: f64) -> Vec<(f64, usize)>
where
    Distance: Metric<T>,
{
    let mut result = ResultSet::radius(radius);
    scan(dataset, distance, query, &mut result);
    result.into_sorted_vec()
}

fn scan<T: Number>(dataset: &Dataset<'_, T>, distance: &Distance, query: &[T], result: &mut ResultSet)
where
    Distance: Metric<T>,
{
    for id in 0..dataset.rows() {
        if dataset.is_removed(id) {
            continue;
        }
        let d = Metric::<T>::full(distance, query, dataset.row(id));
        result.add(d, id);
    }
}
