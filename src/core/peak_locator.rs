//! 峰值定位模块
//!
//! 在直方图上找到计数最大的bin中心。
//!
//! ## 职责边界
//!
//! - ✅ 对（bin中心, 计数）序列做线性扫描，并列时取bin顺序中的第一个
//! - ❌ 不在平滑密度曲线上寻找众数：分辨率受bin宽度限制，与KDE结果刻意解耦
//!
//! 调用方如需连续曲线的众数，使用 `DensityCurve::mode()`。

use super::histogram::{Histogram, HistogramBin};
use crate::error::{AnalysisError, AnalysisResult};

/// 返回第一个达到最大计数的bin
pub fn peak_bin(histogram: &Histogram) -> AnalysisResult<HistogramBin> {
    let mut best: Option<HistogramBin> = None;
    for &bin in histogram.bins() {
        match best {
            Some(b) if b.count >= bin.count => {}
            _ => best = Some(bin),
        }
    }
    best.ok_or(AnalysisError::EmptyHistogram)
}

/// 返回峰值幅度（计数最大bin的中心）
#[inline]
pub fn locate_peak(histogram: &Histogram) -> AnalysisResult<f64> {
    peak_bin(histogram).map(|bin| bin.center)
}
