//! 单 SKU 采集服务 - 业务能力层
//!
//! ## 职责
//!
//! - 对单个 OEM SKU 逐页请求，直到翻页结束或出错
//! - 将全部失败情形折算为结果变体，本函数不返回错误
//! - 只处理单个 SKU，不关心批次与并发

use crate::clients::PageFetcher;
use crate::models::{
    flatten_articles, ItemOutcome, NoMatchRecord, PageResult, Payload, ProblemRecord,
};
use tracing::{debug, info, warn};

/// 采集单个 SKU 的全部页面
///
/// 翻页严格串行：第 n 页的结果确定之前不会请求第 n+1 页。
/// 终止规则：
/// - 空页：第 1 页即为空则记为未命中，否则返回已累积的记录
/// - HTTP 错误：第 1 页出错记为问题项，之后出错视为翻页结束并保留已采集页
/// - 网络层失败：一律记为问题项，保证每个 SKU 都有下落
///
/// # 参数
/// - `fetcher`: 页面抓取器（本任务独占）
/// - `template`: 请求模板，内部克隆后使用
/// - `oem_sku`: 待查询的 OEM SKU
///
/// # 返回
/// 返回该 SKU 的最终结果，恰好一个变体
pub async fn harvest_sku<F: PageFetcher>(
    fetcher: &F,
    template: &Payload,
    oem_sku: &str,
) -> ItemOutcome {
    let mut payload = template.clone();
    let mut records = Vec::new();
    let mut page: u32 = 1;

    loop {
        match fetcher.fetch_page(&mut payload, oem_sku, page).await {
            PageResult::Matched(articles) => {
                let rows = flatten_articles(oem_sku, &articles);
                debug!(
                    "[SKU {}] 第 {} 页命中 {} 个配件，展平为 {} 行",
                    oem_sku,
                    page,
                    articles.len(),
                    rows.len()
                );
                records.extend(rows);
                page += 1;
            }
            PageResult::Empty => {
                if page == 1 {
                    debug!("[SKU {}] 未命中", oem_sku);
                    return ItemOutcome::NoMatch(NoMatchRecord {
                        oem_sku: oem_sku.to_string(),
                    });
                }
                info!("[SKU {}] 翻页结束，共 {} 行", oem_sku, records.len());
                return ItemOutcome::Matched(records);
            }
            PageResult::HttpError { status, body } => {
                if page == 1 {
                    return ItemOutcome::Problem(ProblemRecord {
                        oem_sku: oem_sku.to_string(),
                        error: format!("HTTP {}: {}", status, body),
                    });
                }
                // 已采集的页不丢弃
                warn!(
                    "[SKU {}] 第 {} 页返回 HTTP {}，保留前 {} 行并结束翻页",
                    oem_sku,
                    page,
                    status,
                    records.len()
                );
                return ItemOutcome::Matched(records);
            }
            PageResult::TransportError(message) => {
                return ItemOutcome::Problem(ProblemRecord {
                    oem_sku: oem_sku.to_string(),
                    error: message,
                });
            }
        }
    }
}
