//! 工具模块集合
//!
//! 包含CLI、输入加载、文件扫描、处理与格式化等模块，支持main.rs的流程控制。

pub mod batch_state;
pub mod cli;
pub mod constants;
pub mod formatter;
pub mod loader;
pub mod processor;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use batch_state::{BatchStatsSnapshot, ParallelBatchStats, SerialBatchStats};
pub use cli::{AppConfig, OutputFormat, parse_args, show_completion_info, show_startup_info};
pub use formatter::{create_batch_footer, render_reports, write_output};
pub use loader::{LoadedInput, load_input, load_times, parse_input};
pub use processor::{
    AnalysisOutcome, AnalysisReport, BatchTally, DatasetFailure, analyze_collection, build_report,
    process_input_file, resolve_reference,
};
pub use scanner::{scan_input_files, show_scan_results};
