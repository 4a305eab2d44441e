//! 数据仓库装载接口
//!
//! ## 职责
//!
//! - 定义仓库装载方的能力接口（真实连接器由部署环境接入）
//! - 检查暂存目录并把非空类别交给装载方
//!
//! 装载方约定：消费目录内的全部 CSV 文件并在成功后清空目录。
//! 本模块只保证交付时目录内恰好是本次运行暂存的文件。

use crate::config::Config;
use crate::error::{AppError, AppResult, WarehouseError};
use crate::services::{CATEGORY_MATCHES, CATEGORY_NO_RESPONSES};
use std::fs;
use std::future::Future;
use std::path::Path;
use tracing::{error, info};

/// 仓库装载能力
pub trait WarehouseSink: Send + Sync {
    /// 将一个暂存目录装载为指定表
    ///
    /// # 参数
    /// - `table_name`: 目标表名
    /// - `staging_dir`: 含 CSV 文件的暂存目录
    fn bulk_load(
        &self,
        table_name: &str,
        staging_dir: &Path,
    ) -> impl Future<Output = AppResult<()>> + Send;
}

/// 检查目录中是否存在 CSV 文件
///
/// 目录不存在时视为没有文件。
pub fn has_csv_files(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("csv") {
            return true;
        }
    }

    false
}

/// 将已暂存的类别交给装载方
///
/// 匹配记录装载为 MATCH 表，未命中记录装载为 NO_MATCH 表。
/// 错误记录留在磁盘上供人工检查，不装载。
/// 单个表装载失败只记录日志，不中断其余表。
pub async fn load_staged<S: WarehouseSink>(sink: &S, config: &Config) {
    let pairs = [
        ("MATCH", CATEGORY_MATCHES),
        ("NO_MATCH", CATEGORY_NO_RESPONSES),
    ];

    for (table_name, category) in pairs {
        let dir = Path::new(&config.stage_dir).join(category);

        if !has_csv_files(&dir) {
            info!("ℹ️ {} 没有已暂存的 CSV 文件，跳过装载", dir.display());
            continue;
        }

        match sink.bulk_load(table_name, &dir).await {
            Ok(()) => info!("✓ 表 {} 装载完成", table_name),
            Err(e) => error!("❌ 表 {} 装载失败: {}", table_name, e),
        }
    }
}

/// 干跑装载器
///
/// 只列出将要装载的文件，不连接任何仓库，也不清空目录。
/// 部署环境接入真实连接器时替换此实现。
pub struct DryRunSink;

impl DryRunSink {
    /// 创建新的干跑装载器
    pub fn new() -> Self {
        Self
    }
}

impl Default for DryRunSink {
    fn default() -> Self {
        Self::new()
    }
}

impl WarehouseSink for DryRunSink {
    fn bulk_load(
        &self,
        table_name: &str,
        staging_dir: &Path,
    ) -> impl Future<Output = AppResult<()>> + Send {
        let table_name = table_name.to_string();
        let staging_dir = staging_dir.to_path_buf();

        async move {
            if !has_csv_files(&staging_dir) {
                return Err(AppError::Warehouse(WarehouseError::NoStagedFiles {
                    path: staging_dir.display().to_string(),
                }));
            }

            let entries = fs::read_dir(&staging_dir)
                .map_err(|e| AppError::warehouse_load_failed(table_name.clone(), e))?;

            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("csv") {
                    info!("[表 {}] 待装载文件: {}", table_name, path.display());
                }
            }

            Ok(())
        }
    }
}
