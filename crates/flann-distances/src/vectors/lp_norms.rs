//! Lp-norm distances between two vectors.

use crate::number::Number;

/// Squared Euclidean distance (squared L2-norm).
///
/// Defined as the sum of the squares of the absolute differences between the corresponding
/// elements of the two vectors. This is the distance k-d-tree pruning is built around: it is
/// dimensionwise-additive, so a single coordinate's contribution to the bound can be computed
/// without touching the others.
///
/// # Examples
///
/// ```
/// use flann_distances::vectors::squared_euclidean;
///
/// let x = [1.0_f64, 2.0, 3.0];
/// let y = [4.0_f64, 5.0, 6.0];
/// assert!((squared_euclidean(&x, &y) - 27.0).abs() <= f64::EPSILON);
/// ```
pub fn squared_euclidean<T: Number>(x: &[T], y: &[T]) -> f64 {
    x.iter().zip(y).map(|(&a, &b)| a.abs_diff(b).as_f64().powi(2)).sum()
}

/// Squared Euclidean distance with early exit once the running sum exceeds `worst`.
///
/// Returns `None` as soon as the partial sum can no longer improve on `worst`; the caller should
/// treat `None` as "at least `worst`" rather than as a precise distance.
pub fn squared_euclidean_pruned<T: Number>(x: &[T], y: &[T], worst: f64) -> Option<f64> {
    let mut acc = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        acc += a.abs_diff(b).as_f64().powi(2);
        if acc >= worst {
            return None;
        }
    }
    Some(acc)
}

/// Manhattan distance (L1-norm): the sum of absolute per-coordinate differences.
pub fn manhattan<T: Number>(x: &[T], y: &[T]) -> f64 {
    x.iter().zip(y).map(|(&a, &b)| a.abs_diff(b).as_f64()).sum()
}

/// Chebyshev distance (L-infinity norm): the maximum absolute per-coordinate difference.
///
/// Not dimensionwise-additive: the result is a `max`, not a `sum`, so a single coordinate cannot
/// contribute a partial lower bound independent of the others.
pub fn chebyshev<T: Number>(x: &[T], y: &[T]) -> f64 {
    x.iter().zip(y).map(|(&a, &b)| a.abs_diff(b).as_f64()).fold(0.0, f64::max)
}

/// General Minkowski (Lp) distance, raised to the `p`-th root.
///
/// # Panics
///
/// Never panics; `p < 1` simply produces a result that is not a true metric (the caller is
/// responsible for only requesting `p >= 1`).
pub fn minkowski<T: Number>(x: &[T], y: &[T], p: i32) -> f64 {
    minkowski_p(x, y, p).powf(1.0 / f64::from(p))
}

/// `(Lp-norm)^p`: the sum of the `p`-th powers of the absolute per-coordinate differences.
pub fn minkowski_p<T: Number>(x: &[T], y: &[T], p: i32) -> f64 {
    x.iter().zip(y).map(|(&a, &b)| a.abs_diff(b).as_f64().powi(p)).sum()
}
