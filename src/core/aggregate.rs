//! 概率汇总表
//!
//! 每个数据集一行 {名称, 概率}。时间坐标通过数据集名称显式连接，不依赖行顺序。

use super::analyzer::DatasetAnalysis;
use super::density::DensityCurve;
use super::histogram::Histogram;
use super::margin::MarginInterval;
use crate::error::{AnalysisError, AnalysisResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// 数据集名称 → 时间坐标
pub type TimeTable = BTreeMap<String, f64>;

/// 单行概率记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityRecord {
    pub dataset: String,
    pub probability: f64,
}

/// 连接时间坐标后的记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedProbability {
    pub dataset: String,
    pub time: f64,
    pub probability: f64,
}

/// 展示面板：替代子图网格，仅携带数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub label: String,
    pub histogram: Histogram,
    pub density: DensityCurve,
    pub interval: MarginInterval,
}

/// 概率汇总表（保持数据集插入顺序）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProbabilityTable {
    rows: Vec<ProbabilityRecord>,
}

impl ProbabilityTable {
    pub fn from_analyses<'a>(analyses: impl IntoIterator<Item = &'a DatasetAnalysis>) -> Self {
        Self {
            rows: analyses
                .into_iter()
                .map(|a| ProbabilityRecord {
                    dataset: a.name.clone(),
                    probability: a.probability,
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[ProbabilityRecord] {
        &self.rows
    }

    pub fn get(&self, dataset: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.dataset == dataset)
            .map(|r| r.probability)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按名称连接时间坐标
    ///
    /// 表中任何数据集在 `times` 中缺失时返回错误；`times` 中多余的键被忽略。
    pub fn join_time(&self, times: &TimeTable) -> AnalysisResult<Vec<TimedProbability>> {
        self.rows
            .iter()
            .map(|row| {
                let time = times.get(&row.dataset).copied().ok_or_else(|| {
                    AnalysisError::InvalidInput(format!(
                        "数据集 '{}' 缺少时间坐标 / no time value for dataset",
                        row.dataset
                    ))
                })?;
                if !time.is_finite() {
                    return Err(AnalysisError::InvalidInput(format!(
                        "数据集 '{}' 的时间坐标不是有限值 / time is not finite",
                        row.dataset
                    )));
                }
                Ok(TimedProbability {
                    dataset: row.dataset.clone(),
                    time,
                    probability: row.probability,
                })
            })
            .collect()
    }
}

/// 按时间排序（散点图展示用，时间相同时保持原顺序）
pub fn sort_by_time(mut rows: Vec<TimedProbability>) -> Vec<TimedProbability> {
    rows.sort_by(|a, b| a.time.total_cmp(&b.time));
    rows
}

/// 由分析结果生成展示面板
pub fn panels<'a>(analyses: impl IntoIterator<Item = &'a DatasetAnalysis>) -> Vec<Panel> {
    analyses
        .into_iter()
        .map(|a| Panel {
            label: a.name.clone(),
            histogram: a.histogram.clone(),
            density: a.density.clone(),
            interval: a.interval,
        })
        .collect()
}
