//! K-means tree scenario (S2): high-dimensional Gaussian blobs, top-1 precision.

use flann::{CentersInit, Dataset, Distance, Index, IndexParams, SearchParams};

mod common;

#[test]
fn blob_queries_land_in_their_generating_cluster() {
    let cols = 128;
    let blob_count = 10;
    let rows = 10_000;

    let mut hits = 0usize;
    let repetitions = 50;
    for rep in 0..repetitions {
        let seed = 7 + rep as u64;
        let (flat, _labels, centers) = common::data_gen::blobs(rows, cols, blob_count, 10.0, 0.5, seed);
        let dataset = Dataset::view(&flat, cols).expect("valid dataset");

        let index = Index::build(
            dataset,
            &IndexParams::KMeans {
                branching: 32,
                iterations: 10,
                centers_init: CentersInit::KMeansPlusPlus,
                cb_index: 0.2,
            },
            Distance::SquaredL2,
            seed,
        )
        .expect("build");

        let params = SearchParams {
            checks: Some(128),
            eps: 0.0,
            sorted: true,
        };

        for (blob, center) in centers.iter().enumerate() {
            let top1 = index.knn_search(center, 1, &params).expect("search");
            let Some(&(_, id)) = top1.first() else { continue };
            // `gaussian_blobs` assigns point `i` to blob `i % blob_count`.
            if id % blob_count == blob {
                hits += 1;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let precision = hits as f64 / (repetitions * blob_count) as f64;
    assert!(precision >= 0.9, "expected top-1 precision >= 0.9, got {precision}");
}
