//! 统一错误处理框架
//!
//! 分析流水线的错误类型定义。每个数据集独立失败，由调用方决定跳过还是中止。

use serde::Serialize;
use std::fmt;
use std::io;

/// 幅度分析相关的统一错误类型
#[derive(Debug)]
pub enum AnalysisError {
    /// 样本不足以进行密度估计（少于2个样本，或样本方差为零）
    InsufficientData(String),

    /// 对空直方图进行峰值定位
    EmptyHistogram,

    /// 区间边界非有限值
    InvalidInterval(String),

    /// 输入验证错误（参数、样本值、数据集名称）
    InvalidInput(String),

    /// 文件I/O错误
    IoError(io::Error),

    /// 输入文件格式错误
    FormatError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InsufficientData(msg) => write!(f, "样本不足: {msg}"),
            AnalysisError::EmptyHistogram => write!(f, "直方图为空，无法定位峰值"),
            AnalysisError::InvalidInterval(msg) => write!(f, "区间无效: {msg}"),
            AnalysisError::InvalidInput(msg) => write!(f, "输入验证失败: {msg}"),
            AnalysisError::IoError(err) => write!(f, "文件I/O错误: {err}"),
            AnalysisError::FormatError(msg) => write!(f, "输入格式错误: {msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AnalysisError {
    fn from(err: io::Error) -> Self {
        AnalysisError::IoError(err)
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::FormatError(format!("JSON解析错误: {err}"))
    }
}

/// 分析操作的标准Result类型
pub type AnalysisResult<T> = Result<T, AnalysisError>;

// ==================== 错误转换Helper函数 ====================

/// 创建输入验证错误的helper函数
#[inline]
pub fn invalid_input<E: fmt::Display>(context: &str, err: E) -> AnalysisError {
    AnalysisError::InvalidInput(format!("{context}: {err}"))
}

/// 创建格式错误的helper函数
#[inline]
pub fn format_error<E: fmt::Display>(context: &str, err: E) -> AnalysisError {
    AnalysisError::FormatError(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================
// 用于批量处理中的失败数据集统计

/// 错误类别枚举（用于批量处理统计）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// 数据相关错误（样本不足、直方图为空）
    Data,
    /// 数值相关错误（区间非有限值）
    Numeric,
    /// 输入相关错误（参数或文件内容不合法）
    Input,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
}

impl ErrorCategory {
    /// 从AnalysisError提取错误类别
    pub fn from_analysis_error(e: &AnalysisError) -> Self {
        match e {
            AnalysisError::InsufficientData(_) | AnalysisError::EmptyHistogram => Self::Data,
            AnalysisError::InvalidInterval(_) => Self::Numeric,
            AnalysisError::InvalidInput(_) | AnalysisError::FormatError(_) => Self::Input,
            AnalysisError::IoError(_) => Self::Io,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Data => "数据错误 / Data",
            Self::Numeric => "数值错误 / Numeric",
            Self::Input => "输入错误 / Input",
            Self::Io => "I/O错误 / IO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ErrorCategory::from_analysis_error(&AnalysisError::EmptyHistogram),
            ErrorCategory::Data
        );
        assert_eq!(
            ErrorCategory::from_analysis_error(&AnalysisError::InsufficientData("n=1".into())),
            ErrorCategory::Data
        );
        assert_eq!(
            ErrorCategory::from_analysis_error(&AnalysisError::InvalidInterval("NaN".into())),
            ErrorCategory::Numeric
        );
        assert_eq!(
            ErrorCategory::from_analysis_error(&format_error("data.json", "bad")),
            ErrorCategory::Input
        );
    }

    #[test]
    fn test_io_error_source() {
        let err: AnalysisError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&AnalysisError::EmptyHistogram).is_none());
    }

    #[test]
    fn test_display_contains_context() {
        let err = invalid_input("bandwidth", "must be positive");
        assert!(err.to_string().contains("bandwidth: must be positive"));
    }
}
