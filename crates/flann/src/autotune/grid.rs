//! Candidate parameter grids swept by the autotuner (§4.7 step 4).

use crate::params::CentersInit;

/// K-d forest tree counts tried during grid search.
pub(super) const TREES_GRID: [usize; 5] = [1, 4, 8, 16, 32];

/// K-means Lloyd-iteration caps tried during grid search.
pub(super) const ITERATIONS_GRID: [usize; 4] = [1, 5, 10, 15];

/// K-means branching factors tried during grid search.
pub(super) const BRANCHING_GRID: [usize; 5] = [16, 32, 64, 128, 256];

/// `cb_index` values swept once the best k-means `(iterations, branching)` pair is chosen (§4.7
/// step 6).
pub(super) const CB_INDEX_GRID: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// The center-seeding strategy used throughout grid search. The grid sweeps `(iterations,
/// branching)` and `cb_index`, but not `centers_init`, per §4.7's listed search space.
pub(super) const GRID_CENTERS_INIT: CentersInit = CentersInit::KMeansPlusPlus;
