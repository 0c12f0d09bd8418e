//! Autotuner scenario (S5): grid search should find a configuration meeting the target precision.

use flann::{Dataset, Distance, Index, SearchParams};

mod common;

#[test]
fn autotuned_index_meets_target_precision_on_held_out_queries() {
    let cols = 64;
    let rows = 10_000;
    let flat = common::data_gen::tabular(rows, cols, 31);
    let dataset = Dataset::view(&flat, cols).expect("dataset");

    let result = flann::autotune::autotune(&dataset, Distance::SquaredL2, 0.9, 0.01, 0.0, 0.1, 31).expect("autotune");

    let index = Index::build(Dataset::view(&flat, cols).expect("dataset"), &result.params, Distance::SquaredL2, 31).expect("build tuned index");

    let held_out = common::data_gen::tabular(1_000, cols, 32);
    let results: Vec<Vec<(f64, usize)>> = held_out
        .chunks(cols)
        .map(|q| index.knn_search(q, 1, &result.search_params).expect("search"))
        .collect();

    let oracle = Dataset::view(&flat, cols).expect("dataset");
    let truth = flann::testing::ground_truth(&oracle, &Distance::SquaredL2, &held_out, cols, 1);

    let precision = flann::testing::top1_precision(&results, &truth);
    assert!(precision >= 0.85, "expected observed precision >= 0.85 (0.05 tolerance), got {precision}");
    assert!(result.speedup >= 1.0, "autotuner's chosen configuration should be at least as fast as linear scan, got speedup {}", result.speedup);
}
