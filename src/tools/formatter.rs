//! 输出格式化模块
//!
//! 负责分析报告的格式化输出：终端表格、Markdown与JSON。

use super::batch_state::BatchStatsSnapshot;
use super::cli::{AppConfig, OutputFormat};
use super::processor::{AnalysisReport, BatchTally, DatasetFailure};
use crate::error::{AnalysisError, AnalysisResult, ErrorCategory};
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use std::collections::BTreeMap;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------\n";

/// 创建报告头部信息
pub fn create_output_header(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Amplitude AUC Tool v{VERSION} / Peak margin probability report\n"
    ));
    output.push_str(&format!("log date: {}\n\n", report.generated_at));
    output.push_str(SEPARATOR);
    output.push_str(&format!("Statistics for: {}\n", report.source));
    output.push_str(&format!("Column: {}\n", report.column));
    output.push_str(&format!("Bandwidth: {}\n", report.bandwidth));
    output.push_str(&format!("Margin: {}\n", report.margin.describe()));
    output.push_str(SEPARATOR);
    output.push('\n');

    output
}

fn new_table(format: OutputFormat) -> Table {
    let mut table = Table::new();
    match format {
        OutputFormat::Markdown => {
            table.load_preset(ASCII_MARKDOWN);
        }
        _ => {
            table.load_preset(UTF8_FULL);
            table.set_content_arrangement(ContentArrangement::Dynamic);
        }
    }
    table
}

fn numeric_cell(value: f64, precision: usize) -> Cell {
    Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right)
}

/// 概率结果表
pub fn format_results_table(report: &AnalysisReport, format: OutputFormat) -> String {
    let mut table = new_table(format);
    table.set_header(vec![
        "Dataset / 数据集",
        "Samples / 样本数",
        "Peak / 峰值",
        "Lower / 下界",
        "Upper / 上界",
        "Probability (%) / 概率",
    ]);

    for result in &report.results {
        table.add_row(vec![
            Cell::new(&result.name),
            Cell::new(result.sample_count).set_alignment(CellAlignment::Right),
            numeric_cell(result.peak, 4),
            numeric_cell(result.interval.lower, 4),
            numeric_cell(result.interval.upper, 4),
            numeric_cell(result.probability, 2),
        ]);
    }

    table.to_string()
}

/// 时间-概率表（按时间排序）
pub fn format_timeline_table(report: &AnalysisReport, format: OutputFormat) -> Option<String> {
    let timeline = report.timeline.as_ref()?;
    let mut table = new_table(format);
    table.set_header(vec!["Time (min) / 时间", "Dataset / 数据集", "Probability (%) / 概率"]);

    for row in timeline {
        table.add_row(vec![
            numeric_cell(row.time, 2),
            Cell::new(&row.dataset),
            numeric_cell(row.probability, 2),
        ]);
    }

    Some(table.to_string())
}

/// 失败数据集汇总（按错误类别分组）
pub fn format_failures(report: &AnalysisReport) -> Option<String> {
    if report.failures.is_empty() {
        return None;
    }

    let mut grouped: BTreeMap<ErrorCategory, Vec<&DatasetFailure>> = BTreeMap::new();
    for failure in &report.failures {
        grouped.entry(failure.category).or_default().push(failure);
    }

    let mut output = String::from("失败的数据集 / Failed datasets:\n");
    for (category, failures) in grouped {
        output.push_str(&format!(
            "   {} ({}):\n",
            category.display_name(),
            failures.len()
        ));
        for failure in failures {
            output.push_str(&format!("      {} - {}\n", failure.dataset, failure.message));
        }
    }
    Some(output)
}

/// 以文本格式（表格或Markdown）渲染单个报告
pub fn format_text_report(report: &AnalysisReport, format: OutputFormat) -> String {
    let mut output = create_output_header(report);

    output.push_str(&format_results_table(report, format));
    output.push_str("\n\n");

    if let Some(timeline) = format_timeline_table(report, format) {
        output.push_str(&timeline);
        output.push_str("\n\n");
    }

    if let Some(failures) = format_failures(report) {
        output.push_str(&failures);
        output.push('\n');
    }

    output.push_str(&format!("{}\n", report.stats_line()));
    output
}

/// 渲染一个或多个报告
///
/// JSON格式下单个报告输出对象，多个报告输出数组。
pub fn render_reports(reports: &[AnalysisReport], format: OutputFormat) -> AnalysisResult<String> {
    match format {
        OutputFormat::Json => {
            let json = match reports {
                [single] => serde_json::to_string_pretty(single),
                many => serde_json::to_string_pretty(many),
            };
            json.map_err(|e| AnalysisError::FormatError(format!("JSON序列化失败: {e}")))
        }
        OutputFormat::Table | OutputFormat::Markdown => Ok(reports
            .iter()
            .map(|r| format_text_report(r, format))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn push_stats_block(output: &mut String, stats: &BatchStatsSnapshot) {
    output.push_str(&format!("      成功 / Succeeded: {}\n", stats.processed));
    output.push_str(&format!("      失败 / Failed: {}\n", stats.failed));
    for (category, names) in &stats.error_stats {
        output.push_str(&format!(
            "      {}: {}\n",
            category.display_name(),
            names.join(", ")
        ));
    }
}

/// 生成批量处理的统计尾部（文件级与数据集级）
pub fn create_batch_footer(total_files: usize, tally: &BatchTally) -> String {
    let file_stats = tally.file_stats();
    let dataset_stats = tally.dataset_stats();
    let mut output = String::new();
    output.push_str("=====================================\n");
    output.push_str("批量处理统计 / Batch summary:\n");
    output.push_str(&format!("   文件 / Files: {total_files}\n"));
    push_stats_block(&mut output, &file_stats);
    output.push_str(&format!(
        "   数据集 / Datasets: {}\n",
        dataset_stats.processed + dataset_stats.failed
    ));
    push_stats_block(&mut output, dataset_stats);
    output.push_str("=====================================\n");
    output
}

/// 写出结果：指定输出文件时写文件，否则打印到标准输出
pub fn write_output(content: &str, config: &AppConfig) -> AnalysisResult<()> {
    match &config.output_path {
        Some(path) => {
            std::fs::write(path, content)?;
            eprintln!("💾 结果已保存 / Report saved: {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
