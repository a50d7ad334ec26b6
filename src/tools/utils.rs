//! 工具函数模块
//!
//! 提供文件路径处理与并发度计算等通用工具函数。

use super::constants::parallel_limits;

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（统一处理路径提取逻辑）
    #[inline]
    pub fn extract_filename(path: &Path) -> &str {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
    }

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// 计算实际并发度（夹在允许范围内，且不超过任务数）
pub fn effective_parallel_degree(requested: usize, task_count: Option<usize>) -> usize {
    let degree = requested.clamp(
        parallel_limits::MIN_PARALLEL_DEGREE,
        parallel_limits::MAX_PARALLEL_DEGREE,
    );
    match task_count {
        Some(n) if n > 0 => degree.min(n),
        _ => degree,
    }
}

// 重新导出为平级函数
pub use path::{extract_filename, extract_filename_lossy};
