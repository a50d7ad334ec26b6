//! Amplitude AUC Tool
//!
//! 幅度样本分布分析：对每个数据集计算直方图峰值、核密度估计，
//! 在峰值附近的区间内用梯形法则积分，得到概率（AUC）百分比。
//!
//! ## 核心流程
//! - 直方图：等宽分箱，计数最大的bin中心即峰值（并列取第一个）
//! - 区间：峰值 ±M% 或 峰值 ±K·σ，两种策略相互独立
//! - 密度：高斯核KDE，带宽规则 Scott / Silverman / 固定因子
//! - 积分：筛选 `lower ≤ x ≤ upper` 的点后梯形积分 ×100
//! - 汇总：按数据集名称组织概率表，时间坐标按名称连接

pub mod core;
pub mod error;
pub mod tools;

// 重新导出核心类型
pub use core::{
    AnalysisParams, Bandwidth, Dataset, DatasetAnalysis, DatasetCollection, DensityCurve,
    DensityEstimator, Histogram, MarginInterval, MarginPolicy, ProbabilityTable, TimeTable,
    analyze_dataset,
};
pub use error::{AnalysisError, AnalysisResult, ErrorCategory};
