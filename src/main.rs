//! Amplitude AUC Tool - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成分析任务。

use amplitude_auc::{
    core::TimeTable,
    error::{AnalysisError, ErrorCategory},
    tools::{self, AnalysisReport, AppConfig, BatchTally},
};
use anyhow::Context;
use std::process;
use tracing_subscriber::EnvFilter;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 输入/格式错误
    pub const INPUT_ERROR: i32 = 2;
    /// 数据不足
    pub const DATA_ERROR: i32 = 3;
    /// 数值错误
    pub const NUMERIC_ERROR: i32 = 4;
}

/// 初始化诊断日志（--verbose 时输出debug级别到stderr）
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("amplitude_auc={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 获取错误建议文本
fn get_error_suggestion(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Io => {
            "检查文件路径是否正确，文件是否存在且可读 / Check if file path is correct, file exists and is readable"
        }
        ErrorCategory::Input => {
            "检查输入JSON与命令行参数，使用 --help 查看完整用法 / Check the input JSON and arguments, use --help for usage"
        }
        ErrorCategory::Data => {
            "每个数据集至少需要2个不同的样本值 / Each dataset needs at least 2 distinct samples"
        }
        ErrorCategory::Numeric => {
            "区间边界必须为有限值，检查峰值与区间参数 / Margin bounds must be finite, check peak and margin parameters"
        }
    }
}

/// 错误处理和建议
fn handle_error(error: anyhow::Error) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error:#}");

    let exit_code = match error.downcast_ref::<AnalysisError>() {
        Some(analysis_error) => {
            let category = ErrorCategory::from_analysis_error(analysis_error);
            eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(category));
            match category {
                ErrorCategory::Input => exit_codes::INPUT_ERROR,
                ErrorCategory::Data => exit_codes::DATA_ERROR,
                ErrorCategory::Numeric => exit_codes::NUMERIC_ERROR,
                ErrorCategory::Io => exit_codes::GENERAL_ERROR,
            }
        }
        None => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

fn load_external_times(config: &AppConfig) -> anyhow::Result<Option<TimeTable>> {
    config
        .times_path
        .as_deref()
        .map(|path| {
            tools::load_times(path)
                .with_context(|| format!("加载时间坐标失败 / failed to load times: {}", path.display()))
        })
        .transpose()
}

/// 单文件处理模式
fn process_single_mode(config: &AppConfig, times: Option<&TimeTable>) -> anyhow::Result<()> {
    let report = tools::process_input_file(&config.input_path, times, config)?;
    let content = tools::render_reports(std::slice::from_ref(&report), config.format)?;
    tools::write_output(&content, config)?;
    Ok(())
}

/// 批量处理目录中的输入文件
fn process_batch_mode(config: &AppConfig, times: Option<&TimeTable>) -> anyhow::Result<()> {
    let files = tools::scan_input_files(&config.input_path)?;
    tools::show_scan_results(config, &files);

    if files.is_empty() {
        return Ok(());
    }

    let mut tally = BatchTally::new();
    let mut reports: Vec<AnalysisReport> = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        let filename = tools::utils::extract_filename_lossy(file);
        if config.verbose && config.shows_progress() {
            println!(
                "[PROCESSING] [{}/{}] 处理 / Processing: {filename}",
                index + 1,
                files.len()
            );
        }

        match tools::process_input_file(file, times, config) {
            Ok(report) => {
                tally.record_report(filename, &report);
                reports.push(report);
            }
            Err(e) => {
                if config.fail_fast {
                    return Err(e.into());
                }
                let category = ErrorCategory::from_analysis_error(&e);
                eprintln!(
                    "[FAIL] [{}/{}] {filename} - [{}] {e} / 处理失败",
                    index + 1,
                    files.len(),
                    category.display_name()
                );
                tally.record_file_error(filename, &e);
            }
        }
    }

    let mut content = tools::render_reports(&reports, config.format)?;
    if config.format != tools::OutputFormat::Json {
        content.push('\n');
        content.push_str(&tools::create_batch_footer(files.len(), &tally));
    }
    tools::write_output(&content, config)?;
    Ok(())
}

/// 应用程序主逻辑
fn run(config: &AppConfig) -> anyhow::Result<()> {
    tools::show_startup_info(config);

    let times = load_external_times(config)?;

    if config.is_batch_mode() {
        process_batch_mode(config, times.as_ref())?;
    } else {
        process_single_mode(config, times.as_ref())?;
    }

    tools::show_completion_info(config);
    Ok(())
}

fn main() {
    let config = match tools::parse_args() {
        Ok(config) => config,
        Err(e) => handle_error(e.into()),
    };

    init_tracing(config.verbose);

    if let Err(error) = run(&config) {
        handle_error(error);
    }
}
