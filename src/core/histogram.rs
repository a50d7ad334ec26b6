//! 等宽直方图
//!
//! 直接由样本数值计算（bin中心, 计数）序列，不依赖任何绘图几何。
//!
//! 分箱规则：
//! - `bins` 个等宽bin，范围为样本最小/最大值或调用方指定的范围
//! - 各bin左闭右开 `[e_i, e_{i+1})`，最后一个bin右端闭合
//! - 指定范围之外的样本不计数
//! - 最小值等于最大值时范围扩展为 `[v - 0.5, v + 0.5]`

use super::dataset::stats;
use serde::{Deserialize, Serialize};

/// 单个直方图bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// bin中心幅度
    pub center: f64,

    /// 落在该bin内的样本数
    pub count: u64,
}

/// 等宽直方图容器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    bins: Vec<HistogramBin>,

    /// bin宽度（无bin时为0）
    bin_width: f64,

    /// 参与计数的样本总数
    total_count: u64,
}

impl Histogram {
    /// 由样本计算直方图
    ///
    /// # 参数
    ///
    /// * `samples` - 幅度样本（非有限值被忽略）
    /// * `bin_count` - bin数量，为0时返回空直方图
    /// * `range` - 可选的显式范围 `(lo, hi)`，`None` 时使用样本最小/最大值
    pub fn from_samples(samples: &[f64], bin_count: usize, range: Option<(f64, f64)>) -> Self {
        let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();

        let bounds = match range {
            Some((lo, hi)) if lo.is_finite() && hi.is_finite() && lo <= hi => Some((lo, hi)),
            Some(_) => None,
            None => stats::min_max(&finite),
        };

        let (lo, hi) = match bounds {
            Some(b) if bin_count > 0 => b,
            _ => return Self::empty(),
        };
        let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };

        let width = (hi - lo) / bin_count as f64;
        let edges: Vec<f64> = (0..=bin_count)
            .map(|i| if i == bin_count { hi } else { lo + i as f64 * width })
            .collect();

        let mut counts = vec![0u64; bin_count];
        let mut total_count = 0u64;
        for &value in &finite {
            if value < lo || value > hi {
                continue;
            }
            let index = Self::bin_index(value, &edges);
            counts[index] += 1;
            total_count += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                center: (edges[i] + edges[i + 1]) / 2.0,
                count,
            })
            .collect();

        Self {
            bins,
            bin_width: width,
            total_count,
        }
    }

    /// 由预先计算好的bin序列构建直方图（调用方保证中心递增）
    pub fn from_bins(bins: Vec<HistogramBin>) -> Self {
        let bin_width = match bins.as_slice() {
            [first, second, ..] => second.center - first.center,
            _ => 0.0,
        };
        let total_count = bins.iter().map(|b| b.count).sum();
        Self {
            bins,
            bin_width,
            total_count,
        }
    }

    fn empty() -> Self {
        Self {
            bins: Vec::new(),
            bin_width: 0.0,
            total_count: 0,
        }
    }

    /// 定位样本所在bin：先按宽度估算索引，再用边界修正浮点误差
    fn bin_index(value: f64, edges: &[f64]) -> usize {
        let last = edges.len() - 2;
        let lo = edges[0];
        let width = edges[1] - edges[0];
        let mut index = (((value - lo) / width).floor().max(0.0) as usize).min(last);

        if value < edges[index] && index > 0 {
            index -= 1;
        } else if index < last && value >= edges[index + 1] {
            index += 1;
        }
        index
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    #[inline]
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_range_binning() {
        let samples = [0.0, 0.1, 0.2, 0.9, 1.0];
        let hist = Histogram::from_samples(&samples, 2, None);

        assert_eq!(hist.len(), 2);
        assert_eq!(hist.total_count(), 5);
        // [0, 0.5) 与 [0.5, 1.0]，最大值落入最后一个bin
        assert_eq!(hist.bins()[0].count, 3);
        assert_eq!(hist.bins()[1].count, 2);
        assert!((hist.bins()[0].center - 0.25).abs() < 1e-12);
        assert!((hist.bins()[1].center - 0.75).abs() < 1e-12);
        assert!((hist.bin_width() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_range_excludes_outside() {
        // bin边界 0, 0.25, 0.5, 0.75, 1.0
        let samples = [-0.5, 0.1, 0.3, 0.7, 0.8, 1.5];
        let hist = Histogram::from_samples(&samples, 4, Some((0.0, 1.0)));

        assert_eq!(hist.total_count(), 4);
        let counts: Vec<u64> = hist.bins().iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_constant_samples_widen_range() {
        let hist = Histogram::from_samples(&[2.0, 2.0, 2.0], 3, None);
        assert_eq!(hist.total_count(), 3);
        // 范围 [1.5, 2.5]，样本落在中间bin
        assert_eq!(hist.bins()[1].count, 3);
        assert!((hist.bins()[1].center - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(Histogram::from_samples(&[], 10, None).is_empty());
        assert!(Histogram::from_samples(&[0.1, 0.2], 0, None).is_empty());
        assert!(Histogram::from_samples(&[f64::NAN], 4, None).is_empty());
        assert!(Histogram::from_samples(&[0.1], 4, Some((1.0, 0.0))).is_empty());
    }

    #[test]
    fn test_edge_values_land_in_upper_bin() {
        // 恰好位于边界的样本归入右侧bin，最大值归入最后一个bin
        let samples: Vec<f64> = (0..=8).map(|i| i as f64).collect();
        let hist = Histogram::from_samples(&samples, 8, Some((0.0, 8.0)));
        let counts: Vec<u64> = hist.bins().iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 1, 1, 1, 2]);
    }

    #[test]
    fn test_bin_index_follows_edges() {
        // 3 * 0.1 > 0.3：样本0.3位于第3条边之前，应归入索引2
        let hist = Histogram::from_samples(&[0.0, 0.3, 1.0], 10, Some((0.0, 1.0)));
        assert_eq!(hist.bins()[2].count, 1);
        assert_eq!(hist.bins()[3].count, 0);
    }

    #[test]
    fn test_from_bins() {
        let hist = Histogram::from_bins(vec![
            HistogramBin { center: 0.1, count: 2 },
            HistogramBin { center: 0.3, count: 5 },
        ]);
        assert_eq!(hist.total_count(), 7);
        assert!((hist.bin_width() - 0.2).abs() < 1e-12);
    }
}
