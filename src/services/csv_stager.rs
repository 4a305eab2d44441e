//! CSV 暂存服务 - 业务能力层
//!
//! ## 职责
//!
//! - 将一个批次累积的三类结果分别写入各自目录下的 CSV 文件
//! - 文件名携带批次的索引区间和时间戳
//! - 单个类别整体成功或整体失败，不落半写的文件

use crate::error::{AppError, AppResult};
use crate::models::BatchAccumulator;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 匹配记录目录名
pub const CATEGORY_MATCHES: &str = "oem_matches";
/// 未命中记录目录名
pub const CATEGORY_NO_RESPONSES: &str = "no_responses";
/// 错误记录目录名
pub const CATEGORY_ERRORS: &str = "errors";

/// CSV 暂存器
pub struct CsvStager {
    stage_dir: PathBuf,
    batch_size: usize,
}

impl CsvStager {
    /// 创建新的暂存器
    ///
    /// # 参数
    /// - `stage_dir`: 暂存根目录，类别子目录在写入时创建
    /// - `batch_size`: 批次大小，用于推算文件名中的索引区间
    pub fn new(stage_dir: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self {
            stage_dir: stage_dir.into(),
            batch_size,
        }
    }

    /// 落盘一个批次的累积结果
    ///
    /// 只写非空的类别。某个类别写入失败时记录日志并继续写其余类别。
    /// 调用后累积器被清空。
    ///
    /// # 参数
    /// - `accumulator`: 批次累积器
    /// - `batch_end_index`: 本批次在工作清单中的结束索引（不含）
    ///
    /// # 返回
    /// 返回成功写入的文件路径列表
    pub fn flush(&self, accumulator: &mut BatchAccumulator, batch_end_index: usize) -> Vec<PathBuf> {
        let start = batch_end_index.saturating_sub(self.batch_size);
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut staged = Vec::new();

        let matches = std::mem::take(&mut accumulator.matches);
        if !matches.is_empty() {
            match self.write_category(CATEGORY_MATCHES, &matches, start, batch_end_index, &stamp) {
                Ok(path) => {
                    info!("✓ 已暂存 {} 行匹配记录: {}", matches.len(), path.display());
                    staged.push(path);
                }
                Err(e) => warn!("⚠️ 暂存匹配记录失败: {}", e),
            }
        }

        let no_responses = std::mem::take(&mut accumulator.no_responses);
        if !no_responses.is_empty() {
            match self.write_category(
                CATEGORY_NO_RESPONSES,
                &no_responses,
                start,
                batch_end_index,
                &stamp,
            ) {
                Ok(path) => {
                    info!(
                        "✓ 已暂存 {} 行未命中记录: {}",
                        no_responses.len(),
                        path.display()
                    );
                    staged.push(path);
                }
                Err(e) => warn!("⚠️ 暂存未命中记录失败: {}", e),
            }
        }

        let problems = std::mem::take(&mut accumulator.problems);
        if !problems.is_empty() {
            match self.write_category(CATEGORY_ERRORS, &problems, start, batch_end_index, &stamp) {
                Ok(path) => {
                    info!("✓ 已暂存 {} 行错误记录: {}", problems.len(), path.display());
                    staged.push(path);
                }
                Err(e) => warn!("⚠️ 暂存错误记录失败: {}", e),
            }
        }

        staged
    }

    /// 写入单个类别
    ///
    /// 先写入临时文件，成功后再改名到位，失败时清理临时文件。
    fn write_category<T: Serialize>(
        &self,
        category: &str,
        rows: &[T],
        start: usize,
        end: usize,
        stamp: &str,
    ) -> AppResult<PathBuf> {
        let dir = self.stage_dir.join(category);
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;

        let file_name = format!("{}_{}_{}_{}.csv", category, start, end, stamp);
        let final_path = dir.join(&file_name);
        let tmp_path = dir.join(format!(".{}.tmp", file_name));

        match write_rows(&tmp_path, rows) {
            Ok(()) => {
                fs::rename(&tmp_path, &final_path)
                    .map_err(|e| AppError::file_write_failed(final_path.display().to_string(), e))?;
                Ok(final_path)
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp_path);
                Err(e)
            }
        }
    }
}

/// 序列化记录行到文件
fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::csv_write_failed(path.display().to_string(), e))?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::csv_write_failed(path.display().to_string(), e))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    Ok(())
}
