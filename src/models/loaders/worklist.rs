use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// 从文件加载工作清单
///
/// 文件格式为每行一个 OEM SKU。空行被跳过，
/// 重复的 SKU 只保留第一次出现（保持原有顺序）。
///
/// # 参数
/// - `path`: 工作清单文件路径
///
/// # 返回
/// 返回去重后的 SKU 列表
pub async fn load_worklist(path: &str) -> Result<Vec<String>> {
    if !Path::new(path).exists() {
        anyhow::bail!("工作清单文件不存在: {}", path);
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取工作清单文件: {}", path))?;

    let mut seen = HashSet::new();
    let mut skus = Vec::new();

    for line in content.lines() {
        let sku = line.trim();
        if sku.is_empty() {
            continue;
        }
        if seen.insert(sku.to_string()) {
            skus.push(sku.to_string());
        }
    }

    tracing::info!("已加载 {} 个待查询的 OEM SKU", skus.len());

    Ok(skus)
}
