//! 核心算法模块
//!
//! 包含数据集模型、直方图、核密度估计、峰值定位、区间计算、窗口积分与汇总。

pub mod aggregate;
pub mod analyzer;
pub mod dataset;
pub mod density;
pub mod histogram;
pub mod integrator;
pub mod margin;
pub mod peak_locator;

// 重新导出公共接口
pub use aggregate::{Panel, ProbabilityRecord, ProbabilityTable, TimeTable, TimedProbability};
pub use analyzer::{AnalysisParams, DatasetAnalysis, analyze_dataset};
pub use dataset::{Dataset, DatasetCollection};
pub use density::{Bandwidth, DensityCurve, DensityEstimator, DensityPoint};
pub use histogram::{Histogram, HistogramBin};
pub use integrator::windowed_probability;
pub use margin::{MarginInterval, MarginPolicy, calculate_margins, calculate_margins_std};
pub use peak_locator::locate_peak;
