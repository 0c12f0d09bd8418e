//! Bounded top-K and unbounded radius-r result accumulators.

use std::collections::HashSet;

/// A result accumulator offered `(distance, id)` pairs during traversal.
///
/// Both variants reject duplicate ids and keep their contents sorted ascending by distance, tied
/// by ascending id, matching the reference `KNNResultSet`/`RadiusResultSet` semantics from the
/// original implementation this design is distilled from.
#[derive(Debug, Clone)]
pub enum ResultSet {
    /// Bounded to `capacity` entries; the worst is evicted once full and a better candidate
    /// arrives.
    TopK {
        /// Maximum number of entries retained.
        capacity: usize,
        /// Entries sorted ascending by `(distance, id)`.
        items: Vec<(f64, usize)>,
        /// Ids already present, for O(1) duplicate rejection.
        seen: HashSet<usize>,
    },
    /// Unbounded; accepts everything within `radius`.
    Radius {
        /// The inclusive distance threshold.
        radius: f64,
        /// Accepted entries, sorted ascending by `(distance, id)` as they arrive.
        items: Vec<(f64, usize)>,
        /// Ids already present, for O(1) duplicate rejection.
        seen: HashSet<usize>,
    },
}

impl ResultSet {
    /// A bounded top-`k` result set.
    #[must_use]
    pub fn top_k(k: usize) -> Self {
        Self::TopK {
            capacity: k,
            items: Vec::with_capacity(k),
            seen: HashSet::with_capacity(k),
        }
    }

    /// An unbounded radius-`r` result set.
    #[must_use]
    pub fn radius(r: f64) -> Self {
        Self::Radius {
            radius: r,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// The largest distance this set would currently still accept, or `+inf` if not yet full (for
    /// `TopK`) or always (for `Radius`, whose threshold is fixed at `radius`).
    #[must_use]
    pub fn worst(&self) -> f64 {
        match self {
            Self::TopK { capacity, items, .. } => {
                if items.len() < *capacity {
                    f64::INFINITY
                } else {
                    items.last().map_or(f64::INFINITY, |&(d, _)| d)
                }
            }
            Self::Radius { radius, .. } => *radius,
        }
    }

    /// Whether this set has reached capacity (`TopK`) or is always considered "full" (`Radius`,
    /// which never evicts and is complete once traversal ends).
    #[must_use]
    pub fn full(&self) -> bool {
        match self {
            Self::TopK { capacity, items, .. } => items.len() >= *capacity,
            Self::Radius { .. } => true,
        }
    }

    /// Offers `(dist, id)`. Returns whether it was accepted.
    ///
    /// Rejects a duplicate id outright. For `TopK`, rejects `dist >= worst()` once full; otherwise
    /// inserts preserving ascending `(distance, id)` order, evicting the previous worst if the set
    /// was already full. For `Radius`, accepts anything with `dist <= radius`.
    pub fn add(&mut self, dist: f64, id: usize) -> bool {
        match self {
            Self::TopK { capacity, items, seen } => {
                if seen.contains(&id) {
                    return false;
                }
                if items.len() >= *capacity && dist >= items.last().map_or(f64::INFINITY, |&(d, _)| d) {
                    return false;
                }
                let pos = items.partition_point(|&(d, i)| (d, i) < (dist, id));
                items.insert(pos, (dist, id));
                seen.insert(id);
                if items.len() > *capacity {
                    #[allow(clippy::unwrap_used)]
                    let (_, evicted_id) = items.pop().unwrap();
                    seen.remove(&evicted_id);
                }
                true
            }
            Self::Radius { radius, items, seen } => {
                if dist > *radius || seen.contains(&id) {
                    return false;
                }
                let pos = items.partition_point(|&(d, i)| (d, i) < (dist, id));
                items.insert(pos, (dist, id));
                seen.insert(id);
                true
            }
        }
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::TopK { items, .. } | Self::Radius { items, .. } => items.len(),
        }
    }

    /// Whether no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the set, returning its entries sorted ascending by `(distance, id)`.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<(f64, usize)> {
        match self {
            Self::TopK { items, .. } | Self::Radius { items, .. } => items,
        }
    }
}
