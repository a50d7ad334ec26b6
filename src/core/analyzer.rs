//! 单数据集分析流水线
//!
//! 直方图 → 峰值 → 区间 → KDE → 窗口积分，每一步都是纯函数，数据集之间没有共享状态。

use super::dataset::{Dataset, stats};
use super::density::{Bandwidth, DensityCurve, DensityEstimator};
use super::histogram::Histogram;
use super::integrator::windowed_probability;
use super::margin::{MarginInterval, MarginPolicy};
use super::peak_locator::locate_peak;
use crate::error::{AnalysisError, AnalysisResult};
use serde::Serialize;

/// 分析参数（仅数值参数）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    /// 直方图bin数量
    pub bins: usize,

    /// 直方图范围（None时使用样本最小/最大值）
    pub hist_range: Option<(f64, f64)>,

    /// 密度估计参数
    pub estimator: DensityEstimator,

    /// 区间策略
    pub margin: MarginPolicy,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            bins: crate::tools::constants::defaults::HISTOGRAM_BINS,
            hist_range: None,
            estimator: DensityEstimator::default(),
            margin: MarginPolicy::default(),
        }
    }
}

impl AnalysisParams {
    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.estimator.bandwidth = bandwidth;
        self
    }

    pub fn with_margin(mut self, margin: MarginPolicy) -> Self {
        self.margin = margin;
        self
    }
}

/// 单个数据集的分析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetAnalysis {
    /// 数据集名称
    pub name: String,

    /// 样本数量
    pub sample_count: usize,

    /// 直方图峰值（bin中心）
    pub peak: f64,

    /// 积分区间
    pub interval: MarginInterval,

    /// 区间内概率（百分比）
    pub probability: f64,

    /// 直方图（展示用）
    #[serde(skip)]
    pub histogram: Histogram,

    /// 密度曲线（展示用）
    #[serde(skip)]
    pub density: DensityCurve,
}

/// 分析单个数据集
pub fn analyze_dataset(dataset: &Dataset, params: &AnalysisParams) -> AnalysisResult<DatasetAnalysis> {
    dataset.validate_finite()?;
    if dataset.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "数据集 '{}' 只有{}个样本 / needs at least 2 samples",
            dataset.name,
            dataset.len()
        )));
    }

    let histogram = Histogram::from_samples(&dataset.samples, params.bins, params.hist_range);
    let peak = locate_peak(&histogram)?;
    let interval = params
        .margin
        .interval(peak, stats::sample_std(&dataset.samples))?;
    let density = params.estimator.estimate(&dataset.samples)?;
    let probability = windowed_probability(&density, &interval)?;

    tracing::debug!(
        dataset = %dataset.name,
        samples = dataset.len(),
        peak,
        lower = interval.lower,
        upper = interval.upper,
        probability,
        "dataset analyzed"
    );

    Ok(DatasetAnalysis {
        name: dataset.name.clone(),
        sample_count: dataset.len(),
        peak,
        interval,
        probability,
        histogram,
        density,
    })
}
