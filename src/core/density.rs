//! 高斯核密度估计（KDE）
//!
//! 在样本的有效支撑区间 `[min - cut·h, max + cut·h]` 上等距求值，
//! 其中 `h = factor · s`，`s` 为样本标准差（ddof=1）。
//!
//! 带宽因子规则：
//! - Scott: `n^(-1/5)`
//! - Silverman: `(3n/4)^(-1/5)`
//! - 固定因子：调用方给定的正实数

use super::dataset::stats;
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// 带宽选择规则
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bandwidth {
    /// Scott经验规则
    Scott,
    /// Silverman经验规则
    Silverman,
    /// 固定带宽因子（乘以样本标准差得到核宽度）
    Factor(f64),
}

impl Default for Bandwidth {
    fn default() -> Self {
        Self::Scott
    }
}

impl Bandwidth {
    /// 计算n个样本对应的带宽因子
    pub fn factor(&self, n: usize) -> AnalysisResult<f64> {
        let n = n as f64;
        match *self {
            Self::Scott => Ok(n.powf(-0.2)),
            Self::Silverman => Ok((n * 3.0 / 4.0).powf(-0.2)),
            Self::Factor(f) if f.is_finite() && f > 0.0 => Ok(f),
            Self::Factor(f) => Err(AnalysisError::InvalidInput(format!(
                "带宽因子必须为正有限值 / bandwidth factor must be positive and finite, got {f}"
            ))),
        }
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scott => write!(f, "scott"),
            Self::Silverman => write!(f, "silverman"),
            Self::Factor(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for Bandwidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scott" => Ok(Self::Scott),
            "silverman" => Ok(Self::Silverman),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(Self::Factor)
                .ok_or_else(|| {
                    format!("无效带宽: {s}（可选 scott, silverman 或正数因子） / invalid bandwidth")
                }),
        }
    }
}

/// 密度曲线上的单个求值点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// 密度曲线（x严格递增）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DensityCurve {
    points: Vec<DensityPoint>,
}

impl DensityCurve {
    /// 由(x, density)点构建曲线，要求x严格递增
    pub fn from_points(points: Vec<DensityPoint>) -> AnalysisResult<Self> {
        if points.windows(2).any(|w| !(w[0].x < w[1].x)) {
            return Err(AnalysisError::InvalidInput(
                "密度曲线x值必须严格递增 / density curve x values must be ascending".to_string(),
            ));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[DensityPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 曲线在求值网格上的最大密度点
    pub fn mode(&self) -> Option<DensityPoint> {
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<DensityPoint>, p| match best {
                Some(b) if b.density >= p.density => Some(b),
                _ => Some(p),
            })
    }
}

/// 核密度估计器参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityEstimator {
    /// 带宽规则
    pub bandwidth: Bandwidth,

    /// 求值点数量（≥2）
    pub grid_size: usize,

    /// 支撑区间向两侧延伸的核宽度倍数
    pub cut: f64,
}

impl Default for DensityEstimator {
    fn default() -> Self {
        use crate::tools::constants::defaults;
        Self {
            bandwidth: Bandwidth::default(),
            grid_size: defaults::GRID_SIZE,
            cut: defaults::KDE_CUT,
        }
    }
}

impl DensityEstimator {
    pub fn new(bandwidth: Bandwidth, grid_size: usize, cut: f64) -> Self {
        Self {
            bandwidth,
            grid_size,
            cut,
        }
    }

    /// 核宽度 `h = factor · s`
    pub fn kernel_width(&self, samples: &[f64]) -> AnalysisResult<f64> {
        if samples.len() < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "密度估计至少需要2个样本，实际{}个 / KDE needs at least 2 samples",
                samples.len()
            )));
        }
        // 常数样本的均值存在舍入误差，std不会精确为0，因此先比较最小/最大值
        let constant = stats::min_max(samples).is_none_or(|(min, max)| min == max);
        let std = stats::sample_std(samples).unwrap_or(0.0);
        if constant || !(std.is_finite() && std > 0.0) {
            return Err(AnalysisError::InsufficientData(
                "样本方差为零，核退化 / zero sample variance".to_string(),
            ));
        }
        Ok(self.bandwidth.factor(samples.len())? * std)
    }

    /// 估计密度曲线
    pub fn estimate(&self, samples: &[f64]) -> AnalysisResult<DensityCurve> {
        if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "第{}个样本不是有限值 / sample #{} is not finite",
                index + 1,
                index + 1
            )));
        }
        if self.grid_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "求值点数量至少为2 / grid size must be >= 2, got {}",
                self.grid_size
            )));
        }
        if !self.cut.is_finite() || self.cut < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "cut必须为非负有限值 / cut must be non-negative, got {}",
                self.cut
            )));
        }

        let h = self.kernel_width(samples)?;
        let (min, max) = stats::min_max(samples).unwrap_or((0.0, 0.0));
        let start = min - self.cut * h;
        let end = max + self.cut * h;
        let step = (end - start) / (self.grid_size - 1) as f64;

        let norm = 1.0 / (samples.len() as f64 * h * (2.0 * PI).sqrt());
        let points = (0..self.grid_size)
            .map(|i| {
                let x = if i == self.grid_size - 1 {
                    end
                } else {
                    start + i as f64 * step
                };
                let sum: f64 = samples
                    .iter()
                    .map(|&xi| {
                        let z = (x - xi) / h;
                        (-0.5 * z * z).exp()
                    })
                    .sum();
                DensityPoint {
                    x,
                    density: sum * norm,
                }
            })
            .collect();

        // 核宽度小于样本量级的浮点间距时网格会出现重复x
        DensityCurve::from_points(points).map_err(|_| {
            AnalysisError::InsufficientData(format!(
                "核宽度 {h:e} 低于样本量级的浮点分辨率 / kernel width below float resolution"
            ))
        })
    }
}
