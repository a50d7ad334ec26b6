//! 分析处理模块
//!
//! 对一个输入文件中的所有数据集运行分析流水线（串行或rayon并行），
//! 汇总为概率表，并按名称连接时间坐标。

use super::batch_state::{BatchStatsSnapshot, ParallelBatchStats, SerialBatchStats};
use super::cli::AppConfig;
use super::loader::{self, LoadedInput};
use super::utils;
use crate::core::aggregate::{self, Panel, ProbabilityTable, TimeTable, TimedProbability};
use crate::core::{
    AnalysisParams, Dataset, DatasetAnalysis, DatasetCollection, MarginPolicy, analyze_dataset,
};
use crate::error::{AnalysisError, AnalysisResult, ErrorCategory};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// 单个数据集的失败记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetFailure {
    pub dataset: String,
    pub category: ErrorCategory,
    pub message: String,
}

/// 一组数据集的分析结果（保持输入顺序）
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analyses: Vec<DatasetAnalysis>,
    pub failures: Vec<DatasetFailure>,
    pub stats: BatchStatsSnapshot,
    /// 实际使用的区间策略（参考数据集解析后为固定窗口）
    pub margin: MarginPolicy,
}

/// 单个输入文件的完整报告
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// 输入来源（文件名）
    pub source: String,

    /// 数据列名
    pub column: String,

    /// 生成时间
    pub generated_at: String,

    /// 使用的区间策略
    pub margin: MarginPolicy,

    /// 使用的带宽规则
    pub bandwidth: String,

    /// 各数据集结果
    pub results: Vec<DatasetAnalysis>,

    /// 概率表
    pub probabilities: ProbabilityTable,

    /// 连接时间坐标后的结果（有时间数据时）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimedProbability>>,

    /// 失败的数据集
    pub failures: Vec<DatasetFailure>,

    /// 数据集级统计（按错误类别分组）
    #[serde(skip)]
    pub stats: BatchStatsSnapshot,

    /// 展示面板（--curves）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panels: Option<Vec<Panel>>,
}

impl AnalysisReport {
    pub fn stats_line(&self) -> String {
        format!(
            "{} 成功 / succeeded, {} 失败 / failed",
            self.stats.processed, self.stats.failed
        )
    }

    /// 所有数据集都失败时，该输入文件视为失败
    pub fn all_failed(&self) -> bool {
        self.stats.processed == 0 && self.stats.failed > 0
    }

    /// 首个失败类别（用于文件级统计）
    pub fn primary_failure_category(&self) -> Option<ErrorCategory> {
        self.failures.first().map(|f| f.category)
    }
}

fn failure_of(dataset: &Dataset, error: &AnalysisError) -> DatasetFailure {
    DatasetFailure {
        dataset: dataset.name.clone(),
        category: ErrorCategory::from_analysis_error(error),
        message: error.to_string(),
    }
}

/// 批量模式的文件级与数据集级统计
///
/// 所有数据集都失败的文件计为失败文件，数据集级统计为各文件之和。
#[derive(Debug, Default)]
pub struct BatchTally {
    files: SerialBatchStats,
    datasets: BatchStatsSnapshot,
}

impl BatchTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个成功读取的输入文件
    pub fn record_report(&mut self, name: String, report: &AnalysisReport) {
        self.datasets.merge(&report.stats);
        match report.primary_failure_category() {
            Some(category) if report.all_failed() => {
                self.files.inc_failed(category, name);
            }
            _ => {
                self.files.inc_processed();
            }
        }
    }

    /// 记录一个整体失败的输入文件
    pub fn record_file_error(&mut self, name: String, error: &AnalysisError) {
        self.files
            .inc_failed(ErrorCategory::from_analysis_error(error), name);
    }

    pub fn file_stats(&self) -> BatchStatsSnapshot {
        self.files.snapshot()
    }

    pub fn dataset_stats(&self) -> &BatchStatsSnapshot {
        &self.datasets
    }
}

/// 串行分析所有数据集
pub fn analyze_serial(
    datasets: &DatasetCollection,
    params: &AnalysisParams,
    fail_fast: bool,
) -> AnalysisResult<AnalysisOutcome> {
    let mut stats = SerialBatchStats::new();
    let mut analyses = Vec::with_capacity(datasets.len());
    let mut failures = Vec::new();

    for dataset in datasets {
        match analyze_dataset(dataset, params) {
            Ok(analysis) => {
                stats.inc_processed();
                analyses.push(analysis);
            }
            Err(e) => {
                if fail_fast {
                    return Err(e);
                }
                tracing::warn!(dataset = %dataset.name, error = %e, "dataset skipped");
                stats.inc_failed(ErrorCategory::from_analysis_error(&e), dataset.name.clone());
                failures.push(failure_of(dataset, &e));
            }
        }
    }

    Ok(AnalysisOutcome {
        analyses,
        failures,
        stats: stats.snapshot(),
        margin: params.margin,
    })
}

/// 使用rayon线程池并行分析，结果按输入顺序排列，与串行结果一致
pub fn analyze_parallel(
    datasets: &DatasetCollection,
    params: &AnalysisParams,
    fail_fast: bool,
    parallel_degree: usize,
) -> AnalysisResult<AnalysisOutcome> {
    let stats = ParallelBatchStats::new();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_degree)
        .thread_name(|i| format!("auc-worker-{i}"))
        .build()
        .map_err(|e| AnalysisError::InvalidInput(format!("线程池创建失败: {e}")))?;

    let mut results: Vec<(usize, AnalysisResult<DatasetAnalysis>)> = pool.install(|| {
        datasets
            .as_slice()
            .par_iter()
            .enumerate()
            .map(|(index, dataset)| {
                let result = analyze_dataset(dataset, params);
                match &result {
                    Ok(_) => {
                        stats.inc_processed();
                    }
                    Err(e) => {
                        stats.inc_failed(
                            ErrorCategory::from_analysis_error(e),
                            index,
                            dataset.name.clone(),
                        );
                    }
                }
                (index, result)
            })
            .collect()
    });

    // 按原始顺序排序结果（保证输出顺序）
    results.sort_by_key(|(index, _)| *index);

    let mut analyses = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (index, result) in results {
        match result {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => {
                if fail_fast {
                    return Err(e);
                }
                let dataset = &datasets.as_slice()[index];
                tracing::warn!(dataset = %dataset.name, error = %e, "dataset skipped");
                failures.push(failure_of(dataset, &e));
            }
        }
    }

    Ok(AnalysisOutcome {
        analyses,
        failures,
        stats: stats.snapshot(),
        margin: params.margin,
    })
}

/// 解析参考数据集：用其区间替换为所有数据集共用的固定窗口
///
/// 参考数据集不存在或分析失败时整个输入失败。
pub fn resolve_reference(
    datasets: &DatasetCollection,
    params: &AnalysisParams,
    reference: Option<&str>,
) -> AnalysisResult<AnalysisParams> {
    let Some(name) = reference else {
        return Ok(*params);
    };
    let dataset = datasets.get(name).ok_or_else(|| {
        AnalysisError::InvalidInput(format!(
            "参考数据集 '{name}' 不存在 / reference dataset not found"
        ))
    })?;
    let analysis = analyze_dataset(dataset, params)?;
    tracing::debug!(
        reference = name,
        lower = analysis.interval.lower,
        upper = analysis.interval.upper,
        "shared window resolved"
    );
    Ok(params.with_margin(MarginPolicy::fixed(analysis.interval)))
}

/// 按配置的并发度选择串行或并行
pub fn analyze_collection(
    datasets: &DatasetCollection,
    config: &AppConfig,
) -> AnalysisResult<AnalysisOutcome> {
    let params = resolve_reference(datasets, &config.params, config.reference.as_deref())?;
    let degree = utils::effective_parallel_degree(config.jobs, Some(datasets.len()));
    if degree <= 1 {
        analyze_serial(datasets, &params, config.fail_fast)
    } else {
        if config.verbose && config.shows_progress() {
            println!("⚡ 启用数据集级并行处理：{degree} 并发度 / parallel datasets");
        }
        analyze_parallel(datasets, &params, config.fail_fast, degree)
    }
}

/// 由已加载输入生成报告
///
/// `external_times` 优先于输入文件内嵌的时间坐标。
pub fn build_report(
    source: &str,
    input: LoadedInput,
    external_times: Option<&TimeTable>,
    config: &AppConfig,
) -> AnalysisResult<AnalysisReport> {
    let outcome = analyze_collection(&input.datasets, config)?;
    let probabilities = ProbabilityTable::from_analyses(&outcome.analyses);

    let times = external_times.or(input.times.as_ref());
    let timeline = times
        .map(|t| probabilities.join_time(t).map(aggregate::sort_by_time))
        .transpose()?;

    let panels = config.emit_curves.then(|| aggregate::panels(&outcome.analyses));

    Ok(AnalysisReport {
        source: source.to_string(),
        column: input.column,
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        margin: outcome.margin,
        bandwidth: config.params.estimator.bandwidth.to_string(),
        results: outcome.analyses,
        probabilities,
        timeline,
        failures: outcome.failures,
        stats: outcome.stats,
        panels,
    })
}

/// 处理单个输入文件
pub fn process_input_file(
    path: &Path,
    external_times: Option<&TimeTable>,
    config: &AppConfig,
) -> AnalysisResult<AnalysisReport> {
    let input = loader::load_input(path)?;
    if config.verbose && config.shows_progress() {
        println!(
            "[INFO] {}: {} 个数据集 / datasets",
            utils::extract_filename_lossy(path),
            input.datasets.len()
        );
    }
    build_report(utils::extract_filename(path), input, external_times, config)
}
