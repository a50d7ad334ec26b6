//! 输入文件加载模块
//!
//! JSON输入格式：
//!
//! ```json
//! {
//!   "column": "Peak Amplitude (nA)",
//!   "datasets": [ { "name": "A", "samples": [0.1, 0.12] } ],
//!   "times": { "A": 5.0 }
//! }
//! ```
//!
//! `datasets` 数组顺序即显示顺序；`column` 和 `times` 可省略。

use crate::core::{Dataset, DatasetCollection, TimeTable};
use crate::error::{AnalysisError, AnalysisResult, format_error};
use serde::Deserialize;
use std::path::Path;

use super::constants::defaults;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputFile {
    #[serde(default)]
    column: Option<String>,
    datasets: Vec<Dataset>,
    #[serde(default)]
    times: Option<TimeTable>,
}

/// 已加载的输入
#[derive(Debug, Clone)]
pub struct LoadedInput {
    /// 数据列名（仅展示）
    pub column: String,

    /// 数据集集合
    pub datasets: DatasetCollection,

    /// 内嵌的时间坐标
    pub times: Option<TimeTable>,
}

/// 从JSON文本解析输入
pub fn parse_input(text: &str) -> AnalysisResult<LoadedInput> {
    let input: InputFile = serde_json::from_str(text)?;
    if input.datasets.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "输入中没有数据集 / input contains no datasets".to_string(),
        ));
    }
    Ok(LoadedInput {
        column: input
            .column
            .unwrap_or_else(|| defaults::AMPLITUDE_COLUMN.to_string()),
        datasets: DatasetCollection::from_datasets(input.datasets)?,
        times: input.times,
    })
}

/// 加载输入文件
pub fn load_input(path: &Path) -> AnalysisResult<LoadedInput> {
    let text = std::fs::read_to_string(path)?;
    parse_input(&text).map_err(|e| match e {
        AnalysisError::FormatError(msg) => format_error(&path.display().to_string(), msg),
        other => other,
    })
}

/// 加载时间坐标文件 `{"name": time}`
pub fn load_times(path: &Path) -> AnalysisResult<TimeTable> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| format_error(&path.display().to_string(), e))
}
