//! The autotuner's composite cost function (§4.7 step 5).

/// One grid candidate's measured cost inputs.
#[derive(Debug, Clone, Copy)]
pub(super) struct CandidateCost {
    pub(super) build_time_secs: f64,
    pub(super) search_time_secs: f64,
    pub(super) index_memory_bytes: usize,
    pub(super) dataset_memory_bytes: usize,
}

impl CandidateCost {
    fn time_cost(self, build_weight: f64) -> f64 {
        self.build_time_secs * build_weight + self.search_time_secs
    }

    fn memory_cost(self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.index_memory_bytes as f64 / self.dataset_memory_bytes.max(1) as f64;
        ratio
    }
}

/// Scores every candidate as `time_cost_norm + memory_weight * memory_cost`, where
/// `time_cost_norm` is each candidate's `time_cost` divided by the minimum `time_cost` across all
/// candidates. Returns the index of the minimum-score candidate, or `None` if `candidates` is
/// empty.
pub(super) fn pick_best(candidates: &[CandidateCost], build_weight: f64, memory_weight: f64) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let min_time_cost = candidates.iter().map(|c| c.time_cost(build_weight)).fold(f64::INFINITY, f64::min);
    let min_time_cost = if min_time_cost > 0.0 { min_time_cost } else { 1.0 };

    candidates
        .iter()
        .map(|c| {
            let time_norm = c.time_cost(build_weight) / min_time_cost;
            time_norm + memory_weight * c.memory_cost()
        })
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
}
