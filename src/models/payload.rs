//! 请求报文构造
//!
//! ## 职责
//!
//! - 构造 `getArticles` 调用的请求体
//! - 每次调用返回全新的值，避免并发任务共享可变状态

use crate::config::Config;
use serde::{Deserialize, Serialize};

/// `getArticles` 请求体
///
/// `search_query` 和 `page` 在每次请求前被覆盖，
/// 其余字段在一次运行中保持不变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub article_country: String,
    pub provider: String,
    pub search_query: String,
    pub search_type: u32,
    pub lang: String,
    pub per_page: u32,
    pub page: u32,
    pub include_all: bool,
    pub include_images: bool,
    pub include_generic_articles: bool,
    #[serde(rename = "includeOEMNumbers")]
    pub include_oem_numbers: bool,
}

/// 完整的请求外层结构
#[derive(Debug, Clone, Serialize)]
pub struct GetArticlesRequest {
    #[serde(rename = "getArticles")]
    pub get_articles: Payload,
}

impl Payload {
    /// 构造请求模板（使用默认的包含选项）
    ///
    /// # 参数
    /// - `config`: 配置（提供国家、供应方、语言、分页大小）
    /// - `search_type`: 搜索类型
    ///
    /// # 返回
    /// 返回一个全新的请求模板，`page` 初始为 1，`search_query` 为空
    pub fn build(config: &Config, search_type: u32) -> Self {
        Self::with_flags(config, search_type, false, false, true, true)
    }

    /// 构造请求模板（显式指定包含选项）
    pub fn with_flags(
        config: &Config,
        search_type: u32,
        include_all: bool,
        include_images: bool,
        include_generic_articles: bool,
        include_oem_numbers: bool,
    ) -> Self {
        Self {
            article_country: config.article_country.clone(),
            provider: config.provider.clone(),
            search_query: String::new(),
            search_type,
            lang: config.lang.clone(),
            per_page: config.per_page,
            page: 1,
            include_all,
            include_images,
            include_generic_articles,
            include_oem_numbers,
        }
    }
}
