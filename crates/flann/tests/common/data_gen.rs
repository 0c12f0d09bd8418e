//! Thin wrappers around [`flann::testing`] matching the reference workspace's own
//! `tests/common/data_gen::tabular` naming.

/// `rows` points uniform in `[0, 1)^cols`, flattened row-major.
pub fn tabular(rows: usize, cols: usize, seed: u64) -> Vec<f64> {
    flann::testing::uniform_cube(rows, cols, seed)
}

/// `rows` points drawn from `blobs` Gaussian clusters in `cols` dimensions.
pub fn blobs(rows: usize, cols: usize, blobs: usize, spread: f64, std_dev: f64, seed: u64) -> (Vec<f64>, Vec<usize>, Vec<Vec<f64>>) {
    flann::testing::gaussian_blobs(rows, cols, blobs, spread, std_dev, seed)
}
