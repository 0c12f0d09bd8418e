//! Autotuner: grid search for the (algorithm, parameters) tuple minimizing a build/search/memory
//! cost at a target precision (§4.7).

mod binary_search;
mod cost;
mod grid;

use std::time::Instant;

use flann_distances::{Distance, Metric, Number};
use mt_logger::{mt_log, Level};

use crate::dataset::Dataset;
use crate::error::{FlannError, Result};
use crate::params::{CentersInit, IndexParams, SearchParams};
use crate::random::RandomSource;

use cost::CandidateCost;

/// The autotuner always evaluates 1-NN precision: the fraction of test queries whose returned
/// nearest id matches the linear-scan ground truth's nearest id.
const PRECISION_K: usize = 1;

/// The chosen algorithm, its parameters, and the estimated speedup over linear scan.
#[derive(Debug, Clone)]
pub struct AutotuneResult {
    /// The winning index parameters (never `IndexParams::Autotuned` itself).
    pub params: IndexParams,
    /// The `checks` budget (and, for k-means, the `cb_index`-tuned search behavior) that hit the
    /// target precision during grid search.
    pub search_params: SearchParams,
    /// `linear_time / chosen_search_time`, an estimate, not a guarantee on unseen data (§4.7
    /// "Invariant").
    pub speedup: f64,
}

/// Runs the full autotuning procedure against a sample of `dataset` (§4.7 "Procedure").
///
/// # Errors
///
/// Returns [`FlannError::InvalidParam`] if `target_precision` or `sample_fraction` are out of
/// `(0, 1]`, or propagates a [`FlannError::BuildFailure`] if every grid candidate fails to build.
#[allow(clippy::too_many_arguments)]
pub fn autotune<T: Number>(
    dataset: &Dataset<'_, T>,
    distance: Distance,
    target_precision: f64,
    build_weight: f64,
    memory_weight: f64,
    sample_fraction: f64,
    seed: u64,
) -> Result<AutotuneResult>
where
    Distance: Metric<T>,
{
    if !(0.0..=1.0).contains(&target_precision) || target_precision <= 0.0 {
        return Err(FlannError::InvalidParam {
            name: "target_precision",
            reason: "must be in (0, 1]".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&sample_fraction) || sample_fraction <= 0.0 {
        return Err(FlannError::InvalidParam {
            name: "sample_fraction",
            reason: "must be in (0, 1]".to_string(),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let sampled_count = ((dataset.rows() as f64) * sample_fraction).round().max(1.0) as usize;
    let mut rng = RandomSource::seeded(seed);
    let sample_rows = rng.choose_unique(dataset.rows(), sampled_count);
    let sampled = gather(dataset, &sample_rows);

    let test_count = (sampled.rows() / 10).min(1000);

    let linear_start = Instant::now();
    let test_rows = rng.choose_unique(sampled.rows(), test_count);
    let ground_truth: Vec<usize> = test_rows
        .iter()
        .map(|&q| crate::linear::knn(&sampled, &distance, sampled.row(q), PRECISION_K).first().map_or(q, |&(_, id)| id))
        .collect();
    let linear_time = linear_start.elapsed().as_secs_f64().max(f64::EPSILON);

    if test_rows.len() < 10 {
        mt_log!(Level::Info, "autotune: too few test queries ({}), falling back to linear scan", test_rows.len());
        return Ok(AutotuneResult {
            params: IndexParams::Linear,
            search_params: SearchParams::default(),
            speedup: 1.0,
        });
    }

    let dataset_memory_bytes = sampled.rows() * sampled.cols() * std::mem::size_of::<T>();

    let mut candidates: Vec<(IndexParams, SearchParams, CandidateCost)> = Vec::new();

    for &trees in &grid::TREES_GRID {
        match evaluate_kdforest(&sampled, distance, trees, seed, target_precision, &test_rows, &ground_truth, dataset_memory_bytes) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => mt_log!(Level::Warn, "autotune: kdtree(trees={trees}) candidate discarded: {err}"),
        }
    }

    let mut kmeans_candidates: Vec<(IndexParams, SearchParams, CandidateCost)> = Vec::new();
    for &iterations in &grid::ITERATIONS_GRID {
        for &branching in &grid::BRANCHING_GRID {
            match evaluate_kmeans(
                &sampled,
                distance,
                branching,
                iterations,
                grid::GRID_CENTERS_INIT,
                0.0,
                seed,
                target_precision,
                &test_rows,
                &ground_truth,
                dataset_memory_bytes,
            ) {
                Ok(candidate) => kmeans_candidates.push(candidate),
                Err(err) => mt_log!(Level::Warn, "autotune: kmeans(iterations={iterations}, branching={branching}) candidate discarded: {err}"),
            }
        }
    }

    let kmeans_costs: Vec<CandidateCost> = kmeans_candidates.iter().map(|(_, _, c)| *c).collect();
    if let Some((IndexParams::KMeans { branching, iterations, .. }, _, _)) = cost::pick_best(&kmeans_costs, build_weight, memory_weight).map(|idx| kmeans_candidates[idx].clone()) {
        for &cb_index in &grid::CB_INDEX_GRID {
            if let Ok(candidate) = evaluate_kmeans(
                &sampled,
                distance,
                branching,
                iterations,
                grid::GRID_CENTERS_INIT,
                cb_index,
                seed,
                target_precision,
                &test_rows,
                &ground_truth,
                dataset_memory_bytes,
            ) {
                candidates.push(candidate);
            }
        }
    }
    candidates.extend(kmeans_candidates);

    let costs: Vec<CandidateCost> = candidates.iter().map(|(_, _, c)| *c).collect();
    let Some(best_idx) = cost::pick_best(&costs, build_weight, memory_weight) else {
        return Err(FlannError::BuildFailure {
            reason: "every autotune grid candidate failed to build".to_string(),
        });
    };

    let (params, search_params, winning_cost) = candidates[best_idx].clone();
    let speedup = linear_time / winning_cost.search_time_secs.max(f64::EPSILON);

    mt_log!(Level::Info, "autotune chose {params:?} with checks={:?}, estimated speedup {speedup:.2}x", search_params.checks);

    Ok(AutotuneResult { params, search_params, speedup })
}

fn evaluate_kdforest<T: Number>(
    sampled: &Dataset<'_, T>,
    distance: Distance,
    trees: usize,
    seed: u64,
    target_precision: f64,
    test_rows: &[usize],
    ground_truth: &[usize],
    dataset_memory_bytes: usize,
) -> Result<(IndexParams, SearchParams, CandidateCost)>
where
    Distance: Metric<T>,
{
    let build_start = Instant::now();
    let forest = crate::kdforest::KdForest::build(sampled, trees, seed, distance)?;
    let build_time_secs = build_start.elapsed().as_secs_f64();

    let search_start = Instant::now();
    let checks = binary_search::checks_at_precision(target_precision, |checks| {
        measure_precision_forest(&forest, sampled, test_rows, ground_truth, checks)
    });
    let search_time_secs = search_start.elapsed().as_secs_f64().max(f64::EPSILON);

    let params = IndexParams::KdForest { trees };
    let search_params = SearchParams {
        checks: Some(checks),
        eps: 0.0,
        sorted: true,
    };
    let cost = CandidateCost {
        build_time_secs,
        search_time_secs,
        index_memory_bytes: trees * sampled.rows() * std::mem::size_of::<usize>(),
        dataset_memory_bytes,
    };
    Ok((params, search_params, cost))
}

#[allow(clippy::too_many_arguments)]
fn evaluate_kmeans<T: Number>(
    sampled: &Dataset<'_, T>,
    distance: Distance,
    branching: usize,
    iterations: usize,
    centers_init: CentersInit,
    cb_index: f64,
    seed: u64,
    target_precision: f64,
    test_rows: &[usize],
    ground_truth: &[usize],
    dataset_memory_bytes: usize,
) -> Result<(IndexParams, SearchParams, CandidateCost)>
where
    Distance: Metric<T>,
{
    let build_start = Instant::now();
    let tree = crate::kmeans::KMeansTree::build(sampled, branching, iterations, centers_init, cb_index, seed, distance)?;
    let build_time_secs = build_start.elapsed().as_secs_f64();

    let search_start = Instant::now();
    let checks = binary_search::checks_at_precision(target_precision, |checks| measure_precision_kmeans(&tree, sampled, test_rows, ground_truth, checks));
    let search_time_secs = search_start.elapsed().as_secs_f64().max(f64::EPSILON);

    let params = IndexParams::KMeans {
        branching,
        iterations,
        centers_init,
        cb_index,
    };
    let search_params = SearchParams {
        checks: Some(checks),
        eps: 0.0,
        sorted: true,
    };
    let cost = CandidateCost {
        build_time_secs,
        search_time_secs,
        index_memory_bytes: sampled.rows() * std::mem::size_of::<usize>() * 2,
        dataset_memory_bytes,
    };
    Ok((params, search_params, cost))
}

fn measure_precision_forest<T: Number>(forest: &crate::kdforest::KdForest, sampled: &Dataset<'_, T>, test_rows: &[usize], ground_truth: &[usize], checks: usize) -> f64
where
    Distance: Metric<T>,
{
    let params = SearchParams {
        checks: Some(checks),
        eps: 0.0,
        sorted: true,
    };
    let hits = test_rows
        .iter()
        .zip(ground_truth)
        .filter(|(&q, &truth)| forest.search(sampled, sampled.row(q), PRECISION_K, &params).first().is_some_and(|&(_, id)| id == truth))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let precision = hits as f64 / test_rows.len().max(1) as f64;
    precision
}

fn measure_precision_kmeans<T: Number>(tree: &crate::kmeans::KMeansTree, sampled: &Dataset<'_, T>, test_rows: &[usize], ground_truth: &[usize], checks: usize) -> f64
where
    Distance: Metric<T>,
{
    let params = SearchParams {
        checks: Some(checks),
        eps: 0.0,
        sorted: true,
    };
    let hits = test_rows
        .iter()
        .zip(ground_truth)
        .filter(|(&q, &truth)| tree.search(sampled, sampled.row(q), PRECISION_K, &params).first().is_some_and(|&(_, id)| id == truth))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let precision = hits as f64 / test_rows.len().max(1) as f64;
    precision
}

/// Copies the rows at `indices` out of `dataset` into a fresh, owned, densely re-indexed dataset.
fn gather<T: Number>(dataset: &Dataset<'_, T>, indices: &[usize]) -> Dataset<'static, T> {
    let cols = dataset.cols();
    let mut flat = Vec::with_capacity(indices.len() * cols);
    for &idx in indices {
        flat.extend_from_slice(dataset.row(idx));
    }
    #[allow(clippy::unwrap_used)]
    Dataset::owned(flat, cols).unwrap()
}
