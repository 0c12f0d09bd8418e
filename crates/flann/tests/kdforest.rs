//! KD forest scenarios (S1).

use flann::{Dataset, Distance, Index, IndexParams, SearchParams};

mod common;

#[test]
fn uniform_2d_matches_exact_under_unlimited_checks() {
    let rows = 1000;
    let cols = 2;
    let flat = common::data_gen::tabular(rows, cols, 1);
    let dataset = Dataset::view(&flat, cols).expect("valid dataset");
    let query = [0.5_f64, 0.5_f64];

    let index = Index::build(dataset, &IndexParams::KdForest { trees: 4 }, Distance::SquaredL2, 1).expect("build");

    let approx = index
        .knn_search(&query, 5, &SearchParams { checks: Some(32), eps: 0.0, sorted: true })
        .expect("search");

    assert_eq!(approx.len(), 5);
    let mut ids = approx.iter().map(|&(_, id)| id).collect::<Vec<_>>();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 5, "ids must be distinct");

    let distances = approx.iter().map(|&(d, _)| d).collect::<Vec<_>>();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]), "distances must be ascending: {distances:?}");

    let unlimited = index
        .knn_search(&query, 5, &SearchParams { checks: None, eps: 0.0, sorted: true })
        .expect("search");

    let oracle = Dataset::view(&flat, cols).expect("valid dataset");
    let exact = flann::testing::ground_truth(&oracle, &Distance::SquaredL2, &query, cols, 5);

    let mut unlimited_ids = unlimited.iter().map(|&(_, id)| id).collect::<Vec<_>>();
    unlimited_ids.sort_unstable();
    let mut exact_ids = exact[0].iter().map(|&(_, id)| id).collect::<Vec<_>>();
    exact_ids.sort_unstable();
    assert_eq!(unlimited_ids, exact_ids, "unlimited checks must match the exact-NN set");
}

#[test]
fn rejects_non_additive_distance() {
    let flat = common::data_gen::tabular(50, 3, 2);
    let dataset = Dataset::view(&flat, 3).expect("valid dataset");
    let err = Index::build(dataset, &IndexParams::KdForest { trees: 2 }, Distance::HistogramIntersection, 2);
    assert!(err.is_err(), "kdtree must reject a non-dimensionwise-additive distance");
}
