//! 窗口积分
//!
//! 选取 `lower ≤ x ≤ upper` 的连续点段，用梯形法则积分并乘以100得到百分比概率。
//! 要求曲线x升序，先筛选后积分。

use super::density::{DensityCurve, DensityPoint};
use super::margin::MarginInterval;
use crate::error::{AnalysisError, AnalysisResult};

/// 梯形法则积分（少于2个点时返回0）
pub fn trapezoid(points: &[DensityPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| 0.5 * (w[0].density + w[1].density) * (w[1].x - w[0].x))
        .sum()
}

/// 落在区间内的连续点段
///
/// `lower > upper` 时返回空切片（不交换上下界）。
pub fn window<'a>(curve: &'a DensityCurve, interval: &MarginInterval) -> &'a [DensityPoint] {
    if interval.lower > interval.upper {
        return &[];
    }
    let points = curve.points();
    let start = points.partition_point(|p| p.x < interval.lower);
    let end = points.partition_point(|p| p.x <= interval.upper);
    if start >= end { &[] } else { &points[start..end] }
}

/// 区间内的概率质量（百分比）
pub fn windowed_probability(curve: &DensityCurve, interval: &MarginInterval) -> AnalysisResult<f64> {
    if !interval.lower.is_finite() || !interval.upper.is_finite() {
        return Err(AnalysisError::InvalidInterval(format!(
            "[{}, {}] 边界不是有限值 / bounds are not finite",
            interval.lower, interval.upper
        )));
    }

    let selected = window(curve, interval);
    if selected.len() < 2 {
        return Ok(0.0);
    }
    Ok(trapezoid(selected) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_curve(c: f64) -> DensityCurve {
        let points = (0..=100)
            .map(|i| DensityPoint {
                x: i as f64 / 100.0,
                density: c,
            })
            .collect();
        DensityCurve::from_points(points).unwrap()
    }

    fn interval(lower: f64, upper: f64) -> MarginInterval {
        MarginInterval { lower, upper }
    }

    #[test]
    fn test_uniform_density() {
        let c = 1.5;
        let curve = uniform_curve(c);
        let p = windowed_probability(&curve, &interval(0.2, 0.5)).unwrap();
        assert!((p - c * 0.3 * 100.0).abs() < 1e-9, "p = {p}");
    }

    #[test]
    fn test_reversed_interval_is_zero() {
        let curve = uniform_curve(1.0);
        assert_eq!(windowed_probability(&curve, &interval(0.6, 0.4)).unwrap(), 0.0);
    }

    #[test]
    fn test_fewer_than_two_points_is_zero() {
        let curve = uniform_curve(1.0);
        // 只包含x=0.5一个点
        assert_eq!(windowed_probability(&curve, &interval(0.495, 0.505)).unwrap(), 0.0);
        // 区间位于曲线范围外
        assert_eq!(windowed_probability(&curve, &interval(2.0, 3.0)).unwrap(), 0.0);
        // 空曲线
        let empty = DensityCurve::default();
        assert_eq!(windowed_probability(&empty, &interval(0.0, 1.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_non_finite_bounds() {
        let curve = uniform_curve(1.0);
        assert!(matches!(
            windowed_probability(&curve, &interval(f64::NAN, 0.5)),
            Err(AnalysisError::InvalidInterval(_))
        ));
        assert!(matches!(
            windowed_probability(&curve, &interval(0.0, f64::INFINITY)),
            Err(AnalysisError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let curve = uniform_curve(1.0);
        let selected = window(&curve, &interval(0.25, 0.75));
        assert_eq!(selected.first().map(|p| p.x), Some(0.25));
        assert_eq!(selected.last().map(|p| p.x), Some(0.75));
        assert_eq!(selected.len(), 51);
    }

    #[test]
    fn test_triangle_exact() {
        let curve = DensityCurve::from_points(vec![
            DensityPoint { x: 0.0, density: 0.0 },
            DensityPoint { x: 1.0, density: 2.0 },
            DensityPoint { x: 2.0, density: 0.0 },
        ])
        .unwrap();
        assert_eq!(trapezoid(curve.points()), 2.0);
        assert_eq!(windowed_probability(&curve, &interval(0.0, 1.0)).unwrap(), 100.0);
    }
}
