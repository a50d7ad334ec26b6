//! 基于属性的测试（proptest）
//!
//! 覆盖核心不变量：
//! 1. 密度非负，全网格积分约为1
//! 2. 直方图计数守恒，峰值位于bin中心
//! 3. 两种区间策略的对称性
//! 4. 窗口积分的零值情形与取值范围

use amplitude_auc::core::dataset::stats;
use amplitude_auc::core::integrator::trapezoid;
use amplitude_auc::core::{
    Bandwidth, DensityEstimator, Histogram, MarginInterval, calculate_margins,
    calculate_margins_std, locate_peak, windowed_probability,
};
use proptest::prelude::*;

fn samples_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..1.0, 2..50)
}

fn bandwidth_strategy() -> impl Strategy<Value = Bandwidth> {
    prop_oneof![
        Just(Bandwidth::Scott),
        Just(Bandwidth::Silverman),
        (0.2f64..1.5).prop_map(Bandwidth::Factor),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_density_non_negative_and_normalized(
        samples in samples_strategy(),
        bandwidth in bandwidth_strategy(),
    ) {
        prop_assume!(stats::sample_std(&samples).is_some_and(|s| s > 1e-6));

        let estimator = DensityEstimator { bandwidth, ..DensityEstimator::default() };
        let curve = estimator.estimate(&samples).unwrap();

        prop_assert_eq!(curve.len(), estimator.grid_size);
        prop_assert!(curve.points().iter().all(|p| p.density >= 0.0));
        prop_assert!(curve.points().windows(2).all(|w| w[0].x <= w[1].x));

        // cut=3时支撑区间外的质量可忽略
        let mass = trapezoid(curve.points());
        prop_assert!((mass - 1.0).abs() < 0.01, "mass = {}", mass);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_histogram_conserves_count(
        samples in samples_strategy(),
        bins in 1usize..40,
    ) {
        let histogram = Histogram::from_samples(&samples, bins, None);
        prop_assert_eq!(histogram.len(), bins);
        prop_assert_eq!(histogram.total_count(), samples.len() as u64);

        let peak = locate_peak(&histogram).unwrap();
        prop_assert!(histogram.bins().iter().any(|b| b.center == peak));

        let max_count = histogram.bins().iter().map(|b| b.count).max().unwrap_or(0);
        let first_max = histogram.bins().iter().find(|b| b.count == max_count).unwrap();
        prop_assert_eq!(first_max.center, peak);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_percentage_margin_ratio_symmetric(
        peak in 0.01f64..10.0,
        percent in 0.0f64..100.0,
    ) {
        let (upper, lower) = calculate_margins(peak, percent).unwrap();
        prop_assert!(lower <= peak && peak <= upper);

        let up_ratio = upper / peak - 1.0;
        let down_ratio = 1.0 - lower / peak;
        prop_assert!((up_ratio - down_ratio).abs() < 1e-9);
    }

    #[test]
    fn prop_std_margin_absolute_symmetric(
        peak in -10.0f64..10.0,
        std_dev in 0.0f64..5.0,
        num_std in 0.0f64..4.0,
    ) {
        let (upper, lower) = calculate_margins_std(peak, std_dev, num_std).unwrap();
        prop_assert!(((upper - peak) - (peak - lower)).abs() < 1e-9);
        prop_assert!(lower <= upper);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_window_probability_bounds(
        samples in samples_strategy(),
        a in -0.5f64..1.5,
        b in -0.5f64..1.5,
    ) {
        prop_assume!(stats::sample_std(&samples).is_some_and(|s| s > 1e-6));
        let curve = DensityEstimator::default().estimate(&samples).unwrap();

        let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
        let probability = windowed_probability(&curve, &MarginInterval::new(lower, upper).unwrap()).unwrap();
        prop_assert!(probability >= 0.0);
        prop_assert!(probability <= 101.0, "probability = {}", probability);

        // 上下界颠倒时为0
        if lower < upper {
            let reversed = MarginInterval::new(upper, lower).unwrap();
            prop_assert_eq!(windowed_probability(&curve, &reversed).unwrap(), 0.0);
        }
    }

    #[test]
    fn prop_window_outside_support_is_zero(
        samples in samples_strategy(),
        offset in 10.0f64..100.0,
    ) {
        prop_assume!(stats::sample_std(&samples).is_some_and(|s| s > 1e-6));
        let curve = DensityEstimator::default().estimate(&samples).unwrap();

        let interval = MarginInterval::new(offset, offset + 1.0).unwrap();
        prop_assert_eq!(windowed_probability(&curve, &interval).unwrap(), 0.0);
    }
}
