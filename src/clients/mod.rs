//! 接口客户端层
//!
//! ## 职责
//!
//! - 定义页面抓取的能力接口（便于在测试中用脚本化实现替换）
//! - 提供面向 TecDoc 接口的真实客户端

pub mod techdoc_client;

pub use techdoc_client::{TechdocClient, TechdocClientFactory};

use crate::error::AppResult;
use crate::models::{PageResult, Payload};
use std::future::Future;

/// 页面抓取能力
///
/// 实现者对一个 (SKU, 页码) 发起一次请求并对原始响应分类。
/// 此层不做重试，失败以 `PageResult` 变体的形式返回。
pub trait PageFetcher: Send + Sync {
    /// 抓取一页
    ///
    /// # 参数
    /// - `payload`: 本任务独占的请求体副本，`search_query` 与 `page` 会被覆盖
    /// - `oem_sku`: 本次搜索的 OEM SKU
    /// - `page`: 页码，从 1 开始
    ///
    /// # 返回
    /// 返回分类后的页面结果
    fn fetch_page(
        &self,
        payload: &mut Payload,
        oem_sku: &str,
        page: u32,
    ) -> impl Future<Output = PageResult> + Send;
}

/// 页面抓取器工厂
///
/// 每个并发任务通过工厂获得自己的抓取器实例，
/// 任务之间不共享连接会话。
pub trait FetcherFactory: Send + Sync {
    type Fetcher: PageFetcher + 'static;

    /// 创建一个新的抓取器
    fn create(&self) -> AppResult<Self::Fetcher>;
}
