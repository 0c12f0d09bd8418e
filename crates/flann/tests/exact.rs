//! Exact-mode oracle scenario (S6): linear scan and `knn_search_exact` must agree for small N.

use flann::{CentersInit, Dataset, Distance, Index, IndexParams};
use test_case::test_case;

mod common;

#[test_case(100, 1; "n100_k1")]
#[test_case(1_000, 10; "n1000_k10")]
#[test_case(5_000, 50; "n5000_k50")]
fn kmeans_exact_matches_linear_scan(rows: usize, k: usize) {
    let cols = 6;
    let flat = common::data_gen::tabular(rows, cols, 41);
    let query = common::data_gen::tabular(1, cols, 42);

    let linear = Index::build(Dataset::view(&flat, cols).expect("dataset"), &IndexParams::Linear, Distance::SquaredL2, 1).expect("build linear");
    let kmeans = Index::build(
        Dataset::view(&flat, cols).expect("dataset"),
        &IndexParams::KMeans {
            branching: 16,
            iterations: 10,
            centers_init: CentersInit::KMeansPlusPlus,
            cb_index: 0.2,
        },
        Distance::SquaredL2,
        1,
    )
    .expect("build kmeans");

    let expected = linear.knn_search_exact(&query, k).expect("linear exact search");
    let actual = kmeans.knn_search_exact(&query, k).expect("kmeans exact search");

    let expected_ids: Vec<usize> = expected.iter().map(|&(_, id)| id).collect();
    let actual_ids: Vec<usize> = actual.iter().map(|&(_, id)| id).collect();
    assert_eq!(expected_ids, actual_ids, "exact top-{k} ids must match linear scan for n={rows}");

    for (&(ed, _), &(ad, _)) in expected.iter().zip(actual.iter()) {
        assert!((ed - ad).abs() < 1e-9, "exact distances must match linear scan: {ed} vs {ad}");
    }
}

#[test]
fn kdforest_and_composite_reject_exact_mode() {
    let cols = 3;
    let flat = common::data_gen::tabular(200, cols, 43);

    let forest = Index::build(Dataset::view(&flat, cols).expect("dataset"), &IndexParams::KdForest { trees: 2 }, Distance::SquaredL2, 1).expect("build forest");
    let query = vec![0.0_f64; cols];
    assert!(forest.knn_search_exact(&query, 5).is_err(), "kdtree has no triangle-inequality structure to prune exactly with");
}
