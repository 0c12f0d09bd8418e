//! Correctness tests for the concrete distance functions, mirroring the reference workspace's own
//! `crates/distances` test layout.

use float_cmp::approx_eq;
use test_case::test_case;

use flann_distances::vectors::{chebyshev, chi_squared, hamming, hellinger, histogram_intersection, kl_divergence, manhattan, minkowski, squared_euclidean, squared_euclidean_pruned};

#[test_case(&[0.0, 0.0], &[3.0, 4.0], 25.0; "3-4-5 triangle")]
#[test_case(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 0.0; "identical points")]
fn squared_euclidean_matches_expected(a: &[f64], b: &[f64], expected: f64) {
    assert!(approx_eq!(f64, squared_euclidean(a, b), expected, epsilon = 1e-9));
}

#[test]
fn squared_euclidean_pruned_matches_full_below_worst() {
    let a = [0.0_f64, 0.0];
    let b = [3.0_f64, 4.0];
    assert_eq!(squared_euclidean_pruned(&a, &b, 100.0), Some(25.0));
    assert_eq!(squared_euclidean_pruned(&a, &b, 25.0), None, "must not return a distance that is not strictly below worst");
    assert_eq!(squared_euclidean_pruned(&a, &b, 10.0), None);
}

#[test]
fn manhattan_sums_absolute_differences() {
    let a = [1.0_f64, -2.0, 3.0];
    let b = [4.0_f64, 2.0, 0.0];
    assert!(approx_eq!(f64, manhattan(&a, &b), 3.0 + 4.0 + 3.0, epsilon = 1e-9));
}

#[test]
fn chebyshev_takes_the_max_coordinate_gap() {
    let a = [0.0_f64, 0.0, 0.0];
    let b = [1.0_f64, 5.0, 2.0];
    assert!(approx_eq!(f64, chebyshev(&a, &b), 5.0, epsilon = 1e-9));
}

#[test]
fn minkowski_order_one_matches_manhattan() {
    let a = [1.0_f64, -2.0, 3.0];
    let b = [4.0_f64, 2.0, 0.0];
    assert!(approx_eq!(f64, minkowski(&a, &b, 1), manhattan(&a, &b), epsilon = 1e-9));
}

#[test]
fn minkowski_order_two_matches_euclidean() {
    let a = [0.0_f64, 0.0];
    let b = [3.0_f64, 4.0];
    assert!(approx_eq!(f64, minkowski(&a, &b, 2), squared_euclidean(&a, &b).sqrt(), epsilon = 1e-9));
}

#[test]
fn histogram_intersection_is_zero_for_identical_histograms() {
    let h = [1.0_f64, 2.0, 3.0];
    assert!(approx_eq!(f64, histogram_intersection(&h, &h), 0.0, epsilon = 1e-9));
}

#[test]
fn histogram_intersection_is_one_for_disjoint_histograms() {
    let a = [1.0_f64, 0.0];
    let b = [0.0_f64, 1.0];
    assert!(approx_eq!(f64, histogram_intersection(&a, &b), 1.0, epsilon = 1e-9));
}

#[test]
fn hellinger_is_zero_for_identical_histograms() {
    let h = [1.0_f64, 4.0, 9.0];
    assert!(approx_eq!(f64, hellinger(&h, &h), 0.0, epsilon = 1e-9));
}

#[test]
fn chi_squared_is_zero_for_identical_histograms() {
    let h = [1.0_f64, 2.0, 3.0];
    assert!(approx_eq!(f64, chi_squared(&h, &h), 0.0, epsilon = 1e-9));
}

#[test]
fn chi_squared_skips_double_zero_bins() {
    let a = [0.0_f64, 1.0];
    let b = [0.0_f64, 3.0];
    // First bin is 0/0 (skipped); second contributes (1-3)^2 / (1+3) = 1.
    assert!(approx_eq!(f64, chi_squared(&a, &b), 1.0, epsilon = 1e-9));
}

#[test]
fn kl_divergence_is_zero_for_identical_histograms() {
    let h = [1.0_f64, 2.0, 3.0];
    assert!(approx_eq!(f64, kl_divergence(&h, &h), 0.0, epsilon = 1e-9));
}

#[test]
fn kl_divergence_treats_zero_bins_as_non_contributing() {
    let a = [0.0_f64, 1.0];
    let b = [1.0_f64, 0.0];
    assert!(approx_eq!(f64, kl_divergence(&a, &b), 0.0, epsilon = 1e-9));
}

#[test]
fn hamming_counts_differing_bits() {
    let x: Vec<u64> = vec![0b1010, 0b0011];
    let y: Vec<u64> = vec![0b1000, 0b0111];
    assert!(approx_eq!(f64, hamming(&x, &y), 2.0, epsilon = 1e-9));
}

#[test]
fn hamming_is_zero_for_identical_vectors() {
    let x: Vec<u32> = vec![0xFFFF_FFFF, 0, 0xABCD];
    assert!(approx_eq!(f64, hamming(&x, &x), 0.0, epsilon = 1e-9));
}
