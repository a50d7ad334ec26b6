//! 数据集与样本统计
//!
//! 数据集 = 名称 + 有序幅度样本序列。集合保持插入顺序（仅用于显示），名称在一次运行中唯一。

use crate::error::{AnalysisError, AnalysisResult, invalid_input};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 单个带名称的幅度样本集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// 数据集名称（集合内唯一）
    pub name: String,

    /// 幅度样本（原始顺序）
    pub samples: Vec<f64>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 校验所有样本均为有限值
    pub fn validate_finite(&self) -> AnalysisResult<()> {
        match self.samples.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(AnalysisError::InvalidInput(format!(
                "数据集 '{}' 第{}个样本不是有限值 / sample #{} is not finite",
                self.name,
                index + 1,
                index + 1
            ))),
            None => Ok(()),
        }
    }
}

/// 按插入顺序保存的数据集集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetCollection {
    datasets: Vec<Dataset>,
}

impl DatasetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加数据集，名称重复时拒绝
    pub fn push(&mut self, dataset: Dataset) -> AnalysisResult<()> {
        if self.get(&dataset.name).is_some() {
            return Err(invalid_input(
                "数据集名称重复 / duplicate dataset name",
                &dataset.name,
            ));
        }
        self.datasets.push(dataset);
        Ok(())
    }

    /// 从数据集列表构建集合（检查名称唯一性）
    pub fn from_datasets(datasets: Vec<Dataset>) -> AnalysisResult<Self> {
        let mut seen = HashSet::with_capacity(datasets.len());
        for dataset in &datasets {
            if !seen.insert(dataset.name.as_str()) {
                return Err(invalid_input(
                    "数据集名称重复 / duplicate dataset name",
                    &dataset.name,
                ));
            }
        }
        Ok(Self { datasets })
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dataset> {
        self.datasets.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|d| d.name.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn as_slice(&self) -> &[Dataset] {
        &self.datasets
    }
}

impl<'a> IntoIterator for &'a DatasetCollection {
    type Item = &'a Dataset;
    type IntoIter = std::slice::Iter<'a, Dataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}

/// 样本统计工具函数
pub mod stats {
    /// 算术平均值（空序列返回None）
    pub fn mean(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }

    /// 样本标准差（Bessel校正，ddof=1），少于2个样本返回None
    pub fn sample_std(samples: &[f64]) -> Option<f64> {
        if samples.len() < 2 {
            return None;
        }
        let mean = mean(samples)?;
        let sum_sq: f64 = samples.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((sum_sq / (samples.len() - 1) as f64).sqrt())
    }

    /// 最小值和最大值（空序列返回None）
    pub fn min_max(samples: &[f64]) -> Option<(f64, f64)> {
        let mut iter = samples.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}
