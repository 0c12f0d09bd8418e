//! Persistence round-trip: a saved index, reloaded over the same dataset, must search identically.

use flann::{Dataset, Distance, Index, IndexParams, SearchParams};

mod common;

#[test]
fn save_then_load_preserves_search_results() {
    let cols = 5;
    let flat = common::data_gen::tabular(300, cols, 51);
    let query = common::data_gen::tabular(1, cols, 52);
    let params = SearchParams {
        checks: Some(32),
        eps: 0.0,
        sorted: true,
    };

    let index = Index::build(Dataset::view(&flat, cols).expect("dataset"), &IndexParams::KdForest { trees: 3 }, Distance::SquaredL2, 17).expect("build");
    let before = index.knn_search(&query, 5, &params).expect("search");

    let dir = std::env::temp_dir().join(format!("flann-persist-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("index.bin");
    flann::save_index(&index, &path).expect("save");

    let reloaded_dataset = Dataset::view(&flat, cols).expect("dataset");
    let reloaded = flann::load_index(&path, reloaded_dataset).expect("load");
    let after = reloaded.knn_search(&query, 5, &params).expect("search");

    assert_eq!(before, after, "a reloaded index must reproduce the same search results");

    std::fs::remove_file(&path).ok();
    std::fs::remove_dir(&dir).ok();
}

#[test]
fn load_rejects_dimension_mismatch() {
    let cols = 4;
    let flat = common::data_gen::tabular(100, cols, 61);
    let index = Index::build(Dataset::view(&flat, cols).expect("dataset"), &IndexParams::KdForest { trees: 2 }, Distance::SquaredL2, 1).expect("build");

    let dir = std::env::temp_dir().join(format!("flann-persist-mismatch-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("index.bin");
    flann::save_index(&index, &path).expect("save");

    let wrong_cols_flat = common::data_gen::tabular(100, cols + 1, 62);
    let wrong_dataset = Dataset::view(&wrong_cols_flat, cols + 1).expect("dataset");
    let result = flann::load_index(&path, wrong_dataset);
    assert!(result.is_err(), "loading against a dataset of the wrong dimensionality must fail");

    std::fs::remove_file(&path).ok();
    std::fs::remove_dir(&dir).ok();
}
