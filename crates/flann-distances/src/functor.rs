//! The `Metric` trait and the closed set of distance functors built on top of it.

use crate::{capability::Capabilities, number::Number, vectors};

/// A distance function over `D`-long slices of element type `T`, plus the algebraic capability
/// flags that gate which pruning strategies an index built with it may use.
///
/// Generic index code is parameterized over this trait rather than over a bare closure so that
/// the capability flags travel with the function and cannot be forgotten at a call site.
pub trait Metric<T>: Send + Sync {
    /// The full distance between `a` and `b`. Both slices must have the same length.
    fn full(&self, a: &[T], b: &[T]) -> f64;

    /// The full distance between `a` and `b`, abandoned early and reported as `None` once the
    /// running accumulation can no longer improve on `worst_so_far`.
    ///
    /// The default implementation simply computes the exact distance and compares it; distances
    /// whose accumulation is monotonic (a running sum or max of non-negative terms) override this
    /// to stop scanning the slice as soon as the partial accumulation reaches `worst_so_far`.
    fn full_pruned(&self, a: &[T], b: &[T], worst_so_far: f64) -> Option<f64> {
        let d = self.full(a, b);
        if d < worst_so_far {
            Some(d)
        } else {
            None
        }
    }

    /// The per-dimension contribution of coordinates `a_i` and `b_i` to the full distance.
    ///
    /// Only meaningful when [`capabilities`](Metric::capabilities) reports
    /// `dimensionwise_additive`; callers must not invoke this otherwise.
    fn accum(&self, a: T, b: T) -> f64;

    /// The algebraic properties of this distance.
    fn capabilities(&self) -> Capabilities;
}

/// The closed set of vector distances recognized by a FLANN-style index.
///
/// `Lp` carries its own order; `ChiSquared` and `KlDivergence` treat negative inputs as invalid
/// (the caller's responsibility, since histograms are assumed non-negative).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Distance {
    /// Squared Euclidean (squared L2) distance.
    SquaredL2,
    /// Manhattan (L1) distance.
    L1,
    /// Minkowski (Lp) distance of the given order.
    Lp(i32),
    /// Chebyshev (L-infinity) distance.
    LInf,
    /// Histogram intersection distance.
    HistogramIntersection,
    /// Hellinger distance.
    Hellinger,
    /// Chi-squared distance.
    ChiSquared,
    /// Kullback-Leibler divergence.
    KlDivergence,
}

impl Distance {
    /// A short, stable name used in the persistence header and in diagnostic logging.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::SquaredL2 => "squared_l2",
            Self::L1 => "l1",
            Self::Lp(_) => "lp",
            Self::LInf => "linf",
            Self::HistogramIntersection => "histogram_intersection",
            Self::Hellinger => "hellinger",
            Self::ChiSquared => "chi_squared",
            Self::KlDivergence => "kl_divergence",
        }
    }
}

impl<T: Number> Metric<T> for Distance {
    fn full(&self, a: &[T], b: &[T]) -> f64 {
        match *self {
            Self::SquaredL2 => vectors::squared_euclidean(a, b),
            Self::L1 => vectors::manhattan(a, b),
            Self::Lp(p) => vectors::minkowski(a, b, p),
            Self::LInf => vectors::chebyshev(a, b),
            Self::HistogramIntersection => vectors::histogram_intersection(a, b),
            Self::Hellinger => vectors::hellinger(a, b),
            Self::ChiSquared => vectors::chi_squared(a, b),
            Self::KlDivergence => vectors::kl_divergence(a, b),
        }
    }

    fn full_pruned(&self, a: &[T], b: &[T], worst_so_far: f64) -> Option<f64> {
        match *self {
            // These all accumulate as a non-decreasing sum (or, for `LInf`, a non-decreasing
            // max) of non-negative terms, so we can stop as soon as the partial result reaches
            // `worst_so_far` without ever under-counting the true distance.
            Self::SquaredL2 => vectors::squared_euclidean_pruned(a, b, worst_so_far),
            Self::L1 | Self::Lp(_) | Self::HistogramIntersection | Self::Hellinger | Self::ChiSquared | Self::KlDivergence | Self::LInf => {
                let d = self.full(a, b);
                if d < worst_so_far {
                    Some(d)
                } else {
                    None
                }
            }
        }
    }

    fn accum(&self, a: T, b: T) -> f64 {
        let d = a.abs_diff(b).as_f64();
        match *self {
            Self::SquaredL2 => d * d,
            Self::L1 => d,
            Self::Lp(p) => d.powi(p),
            Self::ChiSquared => {
                let (a, b) = (a.as_f64(), b.as_f64());
                let denom = a + b;
                if denom <= f64::EPSILON {
                    0.0
                } else {
                    (a - b).powi(2) / denom
                }
            }
            Self::KlDivergence => {
                let (a, b) = (a.as_f64(), b.as_f64());
                if a <= f64::EPSILON || b <= f64::EPSILON {
                    0.0
                } else {
                    a * (a / b).ln()
                }
            }
            // Not dimensionwise-additive; callers must check `capabilities()` before using this.
            Self::LInf | Self::HistogramIntersection | Self::Hellinger => d,
        }
    }

    fn capabilities(&self) -> Capabilities {
        match *self {
            Self::SquaredL2 | Self::L1 | Self::Lp(_) => Capabilities::FULL,
            Self::LInf => Capabilities {
                dimensionwise_additive: false,
                vector_space_metric: true,
            },
            Self::HistogramIntersection => Capabilities {
                dimensionwise_additive: false,
                vector_space_metric: false,
            },
            Self::Hellinger => Capabilities::METRIC_ONLY,
            Self::ChiSquared | Self::KlDivergence => Capabilities {
                dimensionwise_additive: true,
                vector_space_metric: false,
            },
        }
    }
}

/// Hamming distance over packed bit vectors (one word per `T`).
///
/// A true metric and dimensionwise-additive at word granularity, so it supports both k-d-tree and
/// k-means-tree pruning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hamming;

impl<T: vectors::hamming::PackedWord> Metric<T> for Hamming {
    fn full(&self, a: &[T], b: &[T]) -> f64 {
        vectors::hamming(a, b)
    }

    fn accum(&self, a: T, b: T) -> f64 {
        f64::from((a ^ b).count_ones())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }
}
