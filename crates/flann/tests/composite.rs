//! Composite index scenario (S3): the union property.

use std::collections::HashSet;

use flann::{CentersInit, Dataset, Distance, Index, IndexParams, SearchParams};

mod common;

#[test]
fn composite_contains_both_halves_within_bounded_symmetric_difference() {
    let cols = 8;
    let rows = 2_000;
    let flat = common::data_gen::tabular(rows, cols, 11);
    let query = common::data_gen::tabular(1, cols, 12);
    let k = 10;
    let params = SearchParams {
        checks: Some(64),
        eps: 0.0,
        sorted: true,
    };

    let forest = Index::build(
        Dataset::view(&flat, cols).expect("dataset"),
        &IndexParams::KdForest { trees: 4 },
        Distance::SquaredL2,
        5,
    )
    .expect("build forest");
    let tree = Index::build(
        Dataset::view(&flat, cols).expect("dataset"),
        &IndexParams::KMeans {
            branching: 16,
            iterations: 10,
            centers_init: CentersInit::KMeansPlusPlus,
            cb_index: 0.2,
        },
        Distance::SquaredL2,
        5,
    )
    .expect("build kmeans");
    let composite = Index::build(
        Dataset::view(&flat, cols).expect("dataset"),
        &IndexParams::Composite {
            trees: 4,
            branching: 16,
            iterations: 10,
            centers_init: CentersInit::KMeansPlusPlus,
            cb_index: 0.2,
        },
        Distance::SquaredL2,
        5,
    )
    .expect("build composite");

    let forest_hits: HashSet<usize> = forest.knn_search(&query, k, &params).expect("search").into_iter().map(|(_, id)| id).collect();
    let tree_hits: HashSet<usize> = tree.knn_search(&query, k, &params).expect("search").into_iter().map(|(_, id)| id).collect();
    let composite_hits: HashSet<usize> = composite.knn_search(&query, k, &params).expect("search").into_iter().map(|(_, id)| id).collect();

    let union: HashSet<usize> = forest_hits.union(&tree_hits).copied().collect();
    let symmetric_difference = union.symmetric_difference(&composite_hits).count();
    assert!(
        symmetric_difference <= k,
        "composite top-{k} should agree with the union of its halves within {k}, got symmetric difference {symmetric_difference}"
    );
}
