//! Remove/re-add scenario (S4): tombstoned ids never resurface, even across a rebuild.

use flann::{Dataset, Distance, Index, IndexParams, SearchParams};

mod common;

#[test]
fn removed_ids_stay_absent_through_add_points_and_rebuild() {
    let cols = 4;
    let rows = 500;
    let flat = common::data_gen::tabular(rows, cols, 21);
    let dataset = Dataset::owned(flat, cols).expect("dataset");

    let mut index = Index::build(dataset, &IndexParams::KdForest { trees: 4 }, Distance::SquaredL2, 9).expect("build");

    for id in [3, 17, 42] {
        index.remove_point(id).expect("remove");
    }

    let query = common::data_gen::tabular(1, cols, 22);
    let params = SearchParams {
        checks: None,
        eps: 0.0,
        sorted: true,
    };

    let before_growth = index.knn_search(&query, rows, &params).expect("search");
    assert!(before_growth.iter().all(|&(_, id)| ![3, 17, 42].contains(&id)), "removed ids must not appear right after removal");

    let extra = common::data_gen::tabular(rows * 2, cols, 23);
    index.add_points(&extra, 1.5).expect("add_points past rebuild_threshold");

    let after_growth = index.knn_search(&query, rows + rows * 2, &params).expect("search");
    assert!(
        after_growth.iter().all(|&(_, id)| ![3, 17, 42].contains(&id)),
        "removed ids must stay absent after a rebuild triggered by add_points"
    );
}
