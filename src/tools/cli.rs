//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use crate::core::{AnalysisParams, Bandwidth, DensityEstimator, MarginPolicy};
use crate::error::{AnalysisError, AnalysisResult};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use super::constants::defaults;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 报告输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// 终端表格
    #[default]
    Table,
    /// JSON
    Json,
    /// Markdown表格
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "amplitude-auc")]
#[command(version, about = DESCRIPTION, author = "Amplitude AUC Team")]
struct Cli {
    /// 输入JSON文件或目录（目录时批量处理其中的 *.json）
    /// Input JSON file, or a directory of JSON files (batch mode)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// 直方图bin数量
    /// Number of histogram bins
    #[arg(long, default_value_t = defaults::HISTOGRAM_BINS)]
    bins: usize,

    /// 直方图范围 LO,HI（默认使用样本最小/最大值）
    /// Histogram range LO,HI (defaults to sample min/max)
    #[arg(long, value_name = "LO,HI", value_parser = parse_range)]
    range: Option<(f64, f64)>,

    /// KDE带宽：scott, silverman 或正数因子
    /// KDE bandwidth: scott, silverman or a positive factor
    #[arg(long, default_value = "scott")]
    bandwidth: Bandwidth,

    /// KDE求值点数量
    /// Number of KDE evaluation points
    #[arg(long, default_value_t = defaults::GRID_SIZE)]
    grid_size: usize,

    /// 支撑区间延伸（核宽度倍数）
    /// Support extension in kernel widths
    #[arg(long, default_value_t = defaults::KDE_CUT)]
    cut: f64,

    /// 百分比区间：峰值 ±M%
    /// Percentage margin: peak ±M%
    #[arg(long, value_name = "M", conflicts_with_all = ["margin_std", "window"])]
    margin_percent: Option<f64>,

    /// 标准差区间：峰值 ±K·σ
    /// Std-dev margin: peak ±K·σ
    #[arg(long, value_name = "K", conflicts_with = "window")]
    margin_std: Option<f64>,

    /// 标准差区间使用的σ（默认使用各数据集的样本标准差）
    /// σ for the std-dev margin (defaults to each dataset's sample std)
    #[arg(long, value_name = "S", requires = "margin_std")]
    std_dev: Option<f64>,

    /// 所有数据集共用的固定积分窗口 LO,HI
    /// Fixed integration window LO,HI shared by all datasets
    #[arg(long, value_name = "LO,HI", value_parser = parse_range)]
    window: Option<(f64, f64)>,

    /// 以指定数据集的区间作为所有数据集的固定窗口
    /// Use the named dataset's interval as the shared window
    #[arg(long, value_name = "DATASET", conflicts_with = "window")]
    reference: Option<String>,

    /// 时间坐标JSON文件 {"name": time}
    /// Time coordinate JSON file {"name": time}
    #[arg(long, value_name = "FILE")]
    times: Option<PathBuf>,

    /// 输出格式
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// 输出结果到文件
    /// Write the report to a file
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// 在JSON报告中包含直方图与密度曲线
    /// Include histogram and density curves in JSON reports
    #[arg(long)]
    curves: bool,

    /// 数据集级并发度（1 = 串行）
    /// Dataset-level parallelism (1 = serial)
    #[arg(long, short = 'j', default_value_t = defaults::JOBS)]
    jobs: usize,

    /// 任一数据集失败即中止
    /// Abort on the first failed dataset
    #[arg(long)]
    fail_fast: bool,

    /// 显示详细处理信息
    /// Verbose output
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_range(s: &str) -> Result<(f64, f64), String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("范围格式应为 LO,HI / expected LO,HI, got '{s}'"))?;
    let lo: f64 = lo.trim().parse().map_err(|e| format!("LO: {e}"))?;
    let hi: f64 = hi.trim().parse().map_err(|e| format!("HI: {e}"))?;
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(format!("范围必须满足 LO < HI / range must satisfy LO < HI, got '{s}'"));
    }
    Ok((lo, hi))
}

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 输入文件路径（单文件模式）或扫描目录（批量模式）
    pub input_path: PathBuf,

    /// 分析参数
    pub params: AnalysisParams,

    /// 参考数据集：其区间作为所有数据集的固定窗口
    pub reference: Option<String>,

    /// 时间坐标文件
    pub times_path: Option<PathBuf>,

    /// 输出格式
    pub format: OutputFormat,

    /// 输出文件路径
    pub output_path: Option<PathBuf>,

    /// 是否输出曲线数据
    pub emit_curves: bool,

    /// 数据集级并发度
    pub jobs: usize,

    /// 失败即中止
    pub fail_fast: bool,

    /// 是否显示详细信息
    pub verbose: bool,
}

impl AppConfig {
    /// 使用默认参数创建配置
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            params: AnalysisParams::default(),
            reference: None,
            times_path: None,
            format: OutputFormat::default(),
            output_path: None,
            emit_curves: false,
            jobs: defaults::JOBS,
            fail_fast: false,
            verbose: false,
        }
    }

    /// 智能判断是否为批量模式（基于路径类型）
    #[inline]
    pub fn is_batch_mode(&self) -> bool {
        self.input_path.is_dir()
    }

    /// JSON报告写到标准输出时不打印进度信息，保证输出可被直接解析
    #[inline]
    pub fn shows_progress(&self) -> bool {
        !(self.format == OutputFormat::Json && self.output_path.is_none())
    }
}

impl TryFrom<Cli> for AppConfig {
    type Error = AnalysisError;

    fn try_from(cli: Cli) -> AnalysisResult<Self> {
        let margin = match (cli.margin_percent, cli.margin_std, cli.window) {
            (Some(percent), _, _) => MarginPolicy::Percentage { percent },
            (None, Some(num_std), _) => MarginPolicy::StdDev {
                num_std,
                std_dev: cli.std_dev,
            },
            (None, None, Some((lower, upper))) => MarginPolicy::Fixed { lower, upper },
            (None, None, None) => MarginPolicy::default(),
        };

        for (name, value) in [
            ("--margin-percent", cli.margin_percent),
            ("--margin-std", cli.margin_std),
            ("--std-dev", cli.std_dev),
        ] {
            if let Some(v) = value
                && !v.is_finite()
            {
                return Err(AnalysisError::InvalidInput(format!(
                    "{name} 必须为有限值 / must be finite, got {v}"
                )));
            }
        }

        if cli.bins == 0 {
            return Err(AnalysisError::InvalidInput(
                "--bins 必须大于0 / must be greater than 0".to_string(),
            ));
        }

        if cli.grid_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "--grid-size 至少为2 / must be at least 2, got {}",
                cli.grid_size
            )));
        }

        if !cli.cut.is_finite() || cli.cut < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "--cut 必须为非负有限值 / must be non-negative and finite, got {}",
                cli.cut
            )));
        }

        Ok(Self {
            input_path: cli.input,
            params: AnalysisParams {
                bins: cli.bins,
                hist_range: cli.range,
                estimator: DensityEstimator::new(cli.bandwidth, cli.grid_size, cli.cut),
                margin,
            },
            reference: cli.reference,
            times_path: cli.times,
            format: cli.format,
            output_path: cli.output,
            emit_curves: cli.curves,
            jobs: cli.jobs,
            fail_fast: cli.fail_fast,
            verbose: cli.verbose,
        })
    }
}

/// 解析命令行参数并创建配置
pub fn parse_args() -> AnalysisResult<AppConfig> {
    AppConfig::try_from(Cli::parse())
}

/// 从参数列表解析配置（测试与嵌入调用）
pub fn parse_args_from<I, T>(args: I) -> AnalysisResult<AppConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| AnalysisError::InvalidInput(e.to_string()))?;
    AppConfig::try_from(cli)
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    if !config.shows_progress() {
        return;
    }
    println!("🚀 Amplitude AUC Tool v{VERSION} 启动");
    println!("📝 {DESCRIPTION}");
    if config.verbose {
        let params = &config.params;
        println!(
            "[INFO] bins={} range={:?} bandwidth={} grid={} cut={} margin={}",
            params.bins,
            params.hist_range,
            params.estimator.bandwidth,
            params.estimator.grid_size,
            params.estimator.cut,
            params.margin.describe()
        );
        if let Some(reference) = &config.reference {
            println!("[INFO] 参考数据集 / reference dataset: {reference}");
        }
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose && config.shows_progress() {
        println!("✅ 所有任务处理完成！ / All done");
    }
}
