//! 文件扫描模块
//!
//! 批量模式下扫描目录中的输入文件（不递归子目录）。

use super::cli::AppConfig;
use super::constants::INPUT_EXTENSIONS;
use super::utils;
use crate::error::{AnalysisError, AnalysisResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 扫描目录中的输入文件，按文件名排序
pub fn scan_input_files(dir_path: &Path) -> AnalysisResult<Vec<PathBuf>> {
    if !dir_path.exists() {
        return Err(AnalysisError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在: {}", dir_path.display()),
        )));
    }

    if !dir_path.is_dir() {
        return Err(AnalysisError::InvalidInput(format!(
            "路径不是目录: {}",
            dir_path.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir_path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            AnalysisError::IoError(std::io::Error::other(format!("目录遍历失败: {e}")))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(extension) = path.extension()
            && let Some(ext_str) = extension.to_str()
            && INPUT_EXTENSIONS.contains(&ext_str.to_lowercase().as_str())
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// 显示文件扫描结果
pub fn show_scan_results(config: &AppConfig, files: &[PathBuf]) {
    if !config.shows_progress() {
        return;
    }
    if files.is_empty() {
        println!(
            "⚠️  在目录 {} 中没有找到输入文件 / no input files found",
            config.input_path.display()
        );
        println!("   支持的格式 / Supported: {}", INPUT_EXTENSIONS.join(", "));
        return;
    }

    println!("📁 扫描目录: {}", config.input_path.display());
    println!("📄 找到 {} 个输入文件 / input files found", files.len());

    if config.verbose {
        for (i, file) in files.iter().enumerate() {
            println!("   {}. {}", i + 1, utils::extract_filename_lossy(file));
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.JSON"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = scan_input_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| utils::extract_filename_lossy(p)).collect();
        assert_eq!(names, vec!["a.JSON", "b.json"]);
    }

    #[test]
    fn test_scan_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            scan_input_files(&missing),
            Err(AnalysisError::IoError(_))
        ));
    }
}
