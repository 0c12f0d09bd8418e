//! Tests for the `Metric` trait's dispatch and capability flags.

use flann_distances::{Capabilities, Distance, Hamming, Metric};

#[test]
fn squared_l2_l1_and_lp_advertise_full_capabilities() {
    for d in [Distance::SquaredL2, Distance::L1, Distance::Lp(3)] {
        assert_eq!(Metric::<f64>::capabilities(&d), Capabilities::FULL);
    }
}

#[test]
fn linf_is_a_metric_but_not_dimensionwise_additive() {
    let caps = Metric::<f64>::capabilities(&Distance::LInf);
    assert!(caps.vector_space_metric);
    assert!(!caps.dimensionwise_additive);
}

#[test]
fn histogram_intersection_is_neither_additive_nor_a_metric() {
    let caps = Metric::<f64>::capabilities(&Distance::HistogramIntersection);
    assert!(!caps.dimensionwise_additive);
    assert!(!caps.vector_space_metric);
}

#[test]
fn hellinger_is_metric_only() {
    assert_eq!(Metric::<f64>::capabilities(&Distance::Hellinger), Capabilities::METRIC_ONLY);
}

#[test]
fn chi_squared_and_kl_divergence_are_additive_but_not_metrics() {
    for d in [Distance::ChiSquared, Distance::KlDivergence] {
        let caps = Metric::<f64>::capabilities(&d);
        assert!(caps.dimensionwise_additive);
        assert!(!caps.vector_space_metric);
    }
}

#[test]
fn accum_sums_to_full_for_dimensionwise_additive_distances() {
    // `SquaredL2`, `L1`, `ChiSquared`, and `KlDivergence` expose `full` as a direct sum of
    // per-dimension terms, so `accum` summed over every coordinate must equal it exactly.
    // `Lp(p)` is additive in its pre-root sum (`minkowski_p`) but `full` itself takes the
    // `p`-th root, so it's checked separately below.
    let a = [1.0_f64, -2.0, 3.5];
    let b = [4.0_f64, 2.0, -1.5];
    for d in [Distance::SquaredL2, Distance::L1, Distance::ChiSquared, Distance::KlDivergence] {
        let summed: f64 = a.iter().zip(b).map(|(&x, y)| Metric::<f64>::accum(&d, x, y)).sum();
        let full = Metric::<f64>::full(&d, &a, &b);
        assert!((summed - full).abs() < 1e-9, "{d:?}: accum sum {summed} did not match full distance {full}");
    }

    let p = 3;
    let summed_pre_root: f64 = a.iter().zip(b).map(|(&x, y)| Metric::<f64>::accum(&Distance::Lp(p), x, y)).sum();
    let full = Metric::<f64>::full(&Distance::Lp(p), &a, &b);
    assert!((summed_pre_root.powf(1.0 / f64::from(p)) - full).abs() < 1e-9, "Lp(3): rooted accum sum did not match full distance");
}

#[test]
fn full_pruned_never_exceeds_full() {
    let a = [1.0_f64, 2.0, 3.0];
    let b = [4.0_f64, 5.0, 6.0];
    let full = Metric::<f64>::full(&Distance::SquaredL2, &a, &b);
    assert_eq!(Metric::<f64>::full_pruned(&Distance::SquaredL2, &a, &b, full + 1.0), Some(full));
    assert_eq!(Metric::<f64>::full_pruned(&Distance::SquaredL2, &a, &b, full), None);
}

#[test]
fn hamming_round_trips_through_the_metric_trait() {
    let x: Vec<u32> = vec![0b1111, 0b0000];
    let y: Vec<u32> = vec![0b1010, 0b0101];
    assert_eq!(Metric::<u32>::full(&Hamming, &x, &y), 4.0);
    assert_eq!(Metric::<u32>::capabilities(&Hamming), Capabilities::FULL);
}
