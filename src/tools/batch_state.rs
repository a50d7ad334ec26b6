//! 批处理状态管理模块
//!
//! 提供统一的数据集级成功/失败统计，支持串行和并行两种模式。

use crate::error::ErrorCategory;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 批处理统计快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStatsSnapshot {
    /// 成功分析的数据集数
    pub processed: usize,
    /// 失败的数据集数
    pub failed: usize,
    /// 错误分类统计（错误类型 -> 失败数据集列表）
    pub error_stats: BTreeMap<ErrorCategory, Vec<String>>,
}

impl BatchStatsSnapshot {
    /// 累加另一份统计（批量模式下汇总各文件的数据集级统计）
    pub fn merge(&mut self, other: &BatchStatsSnapshot) {
        self.processed += other.processed;
        self.failed += other.failed;
        for (category, names) in &other.error_stats {
            self.error_stats
                .entry(*category)
                .or_default()
                .extend(names.iter().cloned());
        }
    }
}

/// 串行批处理统计
#[derive(Debug, Default)]
pub struct SerialBatchStats {
    processed: usize,
    failed: usize,
    error_stats: BTreeMap<ErrorCategory, Vec<String>>,
}

impl SerialBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_processed(&mut self) -> usize {
        self.processed += 1;
        self.processed
    }

    /// 增加失败计数并记录错误分类
    #[inline]
    pub fn inc_failed(&mut self, category: ErrorCategory, name: String) -> usize {
        self.failed += 1;
        self.error_stats.entry(category).or_default().push(name);
        self.failed
    }

    pub fn snapshot(&self) -> BatchStatsSnapshot {
        BatchStatsSnapshot {
            processed: self.processed,
            failed: self.failed,
            error_stats: self.error_stats.clone(),
        }
    }
}

/// 并行批处理统计（多线程安全）
#[derive(Debug, Clone, Default)]
pub struct ParallelBatchStats {
    processed: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    error_stats: Arc<Mutex<BTreeMap<ErrorCategory, Vec<(usize, String)>>>>,
}

impl ParallelBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_processed(&self) -> usize {
        self.processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 增加失败计数并记录错误分类（线程安全）
    ///
    /// `index` 为数据集在输入中的位置，快照按该顺序输出，与完成顺序无关。
    pub fn inc_failed(&self, category: ErrorCategory, index: usize, name: String) -> usize {
        let count = self.failed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Ok(mut stats) = self.error_stats.lock() {
            stats.entry(category).or_default().push((index, name));
        }
        count
    }

    /// 获取统计快照（线程安全）
    pub fn snapshot(&self) -> BatchStatsSnapshot {
        let indexed = self
            .error_stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default();
        let error_stats = indexed
            .into_iter()
            .map(|(category, mut names)| {
                names.sort_by_key(|(index, _)| *index);
                (category, names.into_iter().map(|(_, name)| name).collect())
            })
            .collect();
        BatchStatsSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            error_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn test_serial_stats_basic() {
        let mut stats = SerialBatchStats::new();
        assert_eq!(stats.snapshot(), BatchStatsSnapshot::default());

        assert_eq!(stats.inc_processed(), 1);
        assert_eq!(stats.inc_processed(), 2);

        let category = ErrorCategory::from_analysis_error(&AnalysisError::EmptyHistogram);
        assert_eq!(stats.inc_failed(category, "A".to_string()), 1);
        assert_eq!(stats.inc_failed(category, "B".to_string()), 2);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.processed, 2);
        assert_eq!(snapshot.failed, 2);
        assert_eq!(snapshot.error_stats[&category], vec!["A", "B"]);
    }

    #[test]
    fn test_parallel_stats_concurrent_updates() {
        use rayon::prelude::*;

        let stats = ParallelBatchStats::new();
        (0..100).into_par_iter().for_each(|_| {
            stats.inc_processed();
        });

        let category =
            ErrorCategory::from_analysis_error(&AnalysisError::InsufficientData("n=1".into()));
        (0..50).into_par_iter().for_each(|i| {
            stats.inc_failed(category, i, format!("set{i:02}"));
        });

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.processed, 100);
        assert_eq!(snapshot.failed, 50);
        let names = &snapshot.error_stats[&category];
        assert_eq!(names.len(), 50);
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_snapshot_merge() {
        let mut first = SerialBatchStats::new();
        first.inc_processed();
        first.inc_failed(ErrorCategory::Data, "a1".to_string());
        let mut second = SerialBatchStats::new();
        second.inc_failed(ErrorCategory::Data, "b1".to_string());
        second.inc_failed(ErrorCategory::Numeric, "b2".to_string());

        let mut total = BatchStatsSnapshot::default();
        total.merge(&first.snapshot());
        total.merge(&second.snapshot());

        assert_eq!(total.processed, 1);
        assert_eq!(total.failed, 3);
        assert_eq!(total.error_stats[&ErrorCategory::Data], vec!["a1", "b1"]);
        assert_eq!(total.error_stats[&ErrorCategory::Numeric], vec!["b2"]);
    }

    #[test]
    fn test_parallel_stats_clone_shares_state() {
        let stats1 = ParallelBatchStats::new();
        stats1.inc_processed();
        let stats2 = stats1.clone();
        stats2.inc_processed();
        assert_eq!(stats1.snapshot().processed, 2);
    }
}
