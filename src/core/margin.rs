//! 峰值区间计算
//!
//! 相互独立、显式命名的策略：
//! - 百分比策略：`(p·(1+m/100), p·(1−m/100))`，比例意义上对称
//! - 标准差策略：`(p+kσ, p−kσ)`，绝对值意义上对称
//! - 固定窗口：所有数据集共用同一个 `[lower, upper]`，与各自峰值无关，
//!   用于在不同时间点之间比较同一幅度窗口
//!
//! 不做任何边界裁剪（下界可为负），由调用方解释。

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// 积分窗口 `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginInterval {
    pub lower: f64,
    pub upper: f64,
}

impl MarginInterval {
    /// 构建区间，边界必须为有限值（不交换上下界）
    pub fn new(lower: f64, upper: f64) -> AnalysisResult<Self> {
        ensure_finite("lower", lower)?;
        ensure_finite("upper", upper)?;
        Ok(Self { lower, upper })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

fn ensure_finite(name: &str, value: f64) -> AnalysisResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnalysisError::InvalidInterval(format!(
            "{name} = {value} 不是有限值 / is not finite"
        )))
    }
}

/// 百分比区间，返回 `(upper, lower)`
pub fn calculate_margins(peak_value: f64, margin_percent: f64) -> AnalysisResult<(f64, f64)> {
    ensure_finite("peak", peak_value)?;
    ensure_finite("margin_percent", margin_percent)?;
    let margin_ratio = margin_percent / 100.0;
    let upper = peak_value * (1.0 + margin_ratio);
    let lower = peak_value * (1.0 - margin_ratio);
    ensure_finite("upper", upper)?;
    ensure_finite("lower", lower)?;
    Ok((upper, lower))
}

/// 标准差区间，返回 `(upper, lower)`
pub fn calculate_margins_std(
    peak_value: f64,
    std_dev: f64,
    num_std: f64,
) -> AnalysisResult<(f64, f64)> {
    ensure_finite("peak", peak_value)?;
    ensure_finite("std_dev", std_dev)?;
    ensure_finite("num_std", num_std)?;
    let offset = num_std * std_dev;
    let upper = peak_value + offset;
    let lower = peak_value - offset;
    ensure_finite("upper", upper)?;
    ensure_finite("lower", lower)?;
    Ok((upper, lower))
}

/// 区间策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MarginPolicy {
    /// 峰值的百分比
    Percentage { percent: f64 },

    /// 峰值 ± k个标准差；`std_dev` 为空时使用数据集自身的样本标准差
    StdDev { num_std: f64, std_dev: Option<f64> },

    /// 所有数据集共用的固定窗口
    Fixed { lower: f64, upper: f64 },
}

impl Default for MarginPolicy {
    fn default() -> Self {
        Self::Percentage {
            percent: crate::tools::constants::defaults::MARGIN_PERCENT,
        }
    }
}

impl MarginPolicy {
    /// 标准差策略（k取默认倍数）
    pub fn std_dev(std_dev: Option<f64>) -> Self {
        Self::StdDev {
            num_std: crate::tools::constants::defaults::MARGIN_NUM_STD,
            std_dev,
        }
    }

    /// 按策略计算区间
    ///
    /// `sample_std` 为数据集样本标准差，仅在标准差策略未显式给出σ时使用。
    pub fn interval(&self, peak_value: f64, sample_std: Option<f64>) -> AnalysisResult<MarginInterval> {
        let (upper, lower) = match *self {
            Self::Percentage { percent } => calculate_margins(peak_value, percent)?,
            Self::StdDev { num_std, std_dev } => {
                let sigma = std_dev.or(sample_std).ok_or_else(|| {
                    AnalysisError::InsufficientData(
                        "无法计算标准差（样本少于2个） / std dev needs at least 2 samples"
                            .to_string(),
                    )
                })?;
                calculate_margins_std(peak_value, sigma, num_std)?
            }
            Self::Fixed { lower, upper } => (upper, lower),
        };
        MarginInterval::new(lower, upper)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Percentage { percent } => format!("±{percent}% of peak"),
            Self::StdDev {
                num_std,
                std_dev: Some(sigma),
            } => format!("±{num_std}σ (σ = {sigma})"),
            Self::StdDev {
                num_std,
                std_dev: None,
            } => format!("±{num_std}σ (sample std)"),
            Self::Fixed { lower, upper } => format!("fixed window [{lower}, {upper}]"),
        }
    }

    /// 由已计算的区间生成固定窗口策略
    pub fn fixed(interval: MarginInterval) -> Self {
        Self::Fixed {
            lower: interval.lower,
            upper: interval.upper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_margins() {
        let (upper, lower) = calculate_margins(0.5, 10.0).unwrap();
        assert!((upper - 0.55).abs() < 1e-12);
        assert!((lower - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_percentage_symmetric_in_ratio() {
        let peak = 0.37;
        let (upper, lower) = calculate_margins(peak, 25.0).unwrap();
        assert!(((upper / peak - 1.0) - (1.0 - lower / peak)).abs() < 1e-12);
    }

    #[test]
    fn test_percentage_no_clipping() {
        // 超过100%时下界为负，不做裁剪
        let (upper, lower) = calculate_margins(0.5, 150.0).unwrap();
        assert!((upper - 1.25).abs() < 1e-12);
        assert!((lower + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_std_margins_symmetric() {
        let peak = 0.375;
        let (upper, lower) = calculate_margins_std(peak, 0.125, 2.0).unwrap();
        assert_eq!(upper - peak, peak - lower);
        assert_eq!((upper, lower), (0.625, 0.125));
    }

    #[test]
    fn test_non_finite_inputs() {
        assert!(matches!(
            calculate_margins(f64::NAN, 10.0),
            Err(AnalysisError::InvalidInterval(_))
        ));
        assert!(matches!(
            calculate_margins(0.5, f64::INFINITY),
            Err(AnalysisError::InvalidInterval(_))
        ));
        assert!(matches!(
            calculate_margins_std(0.5, f64::NAN, 1.0),
            Err(AnalysisError::InvalidInterval(_))
        ));
        assert!(matches!(
            calculate_margins(f64::MAX, 200.0),
            Err(AnalysisError::InvalidInterval(_))
        ));
        assert!(MarginInterval::new(0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_policy_interval() {
        let interval = MarginPolicy::Percentage { percent: 10.0 }
            .interval(0.5, None)
            .unwrap();
        assert!(interval.lower <= 0.5 && 0.5 <= interval.upper);

        let interval = MarginPolicy::std_dev(None).interval(0.5, Some(0.1)).unwrap();
        assert!((interval.lower - 0.4).abs() < 1e-12);
        assert!((interval.upper - 0.6).abs() < 1e-12);

        // 显式σ优先于样本标准差
        let interval = MarginPolicy::std_dev(Some(0.2))
            .interval(0.5, Some(0.1))
            .unwrap();
        assert!((interval.width() - 0.4).abs() < 1e-12);

        assert!(matches!(
            MarginPolicy::std_dev(None).interval(0.5, None),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_fixed_window_ignores_peak() {
        let policy = MarginPolicy::Fixed {
            lower: 0.4,
            upper: 0.6,
        };
        for peak in [0.1, 0.5, 3.0] {
            let interval = policy.interval(peak, Some(0.2)).unwrap();
            assert_eq!((interval.lower, interval.upper), (0.4, 0.6));
        }
        assert!(
            MarginPolicy::Fixed {
                lower: f64::NAN,
                upper: 0.6
            }
            .interval(0.5, None)
            .is_err()
        );
        assert_eq!(
            MarginPolicy::fixed(MarginInterval::new(0.1, 0.2).unwrap()),
            MarginPolicy::Fixed {
                lower: 0.1,
                upper: 0.2
            }
        );
    }

    #[test]
    fn test_contains() {
        let interval = MarginInterval::new(0.45, 0.55).unwrap();
        assert!(interval.contains(0.45));
        assert!(interval.contains(0.55));
        assert!(!interval.contains(0.56));
    }
}
