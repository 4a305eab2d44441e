//! TecDoc 配件目录客户端
//!
//! 封装所有与配件目录接口相关的调用逻辑

use crate::clients::{FetcherFactory, PageFetcher};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ArticlesResponse, GetArticlesRequest, PageResult, Payload};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

/// 配件目录客户端
///
/// 每个实例持有自己的 HTTP 会话，并发任务之间互不共享。
pub struct TechdocClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl TechdocClient {
    /// 创建新的配件目录客户端
    ///
    /// 请求超时来自配置，挂起的请求最多占用一个并发槽位到超时为止。
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_client_build_failed(e))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl PageFetcher for TechdocClient {
    /// 抓取并分类一页
    ///
    /// 分类顺序：
    /// 1. 网络层失败（连接、超时、响应读取）
    /// 2. HTTP 状态码非 200
    /// 3. 200 且 `articles` 非空
    /// 4. 200 且 `articles` 为空
    ///
    /// 200 响应体无法解析时按网络层失败处理，不向上抛出。
    fn fetch_page(
        &self,
        payload: &mut Payload,
        oem_sku: &str,
        page: u32,
    ) -> impl Future<Output = PageResult> + Send {
        async move {
            payload.search_query = oem_sku.to_string();
            payload.page = page;

            let request = GetArticlesRequest {
                get_articles: payload.clone(),
            };

            debug!("[SKU {}] 请求第 {} 页", oem_sku, page);

            let response = match self
                .http
                .post(&self.endpoint)
                .query(&[("api_key", self.api_key.as_str())])
                .json(&request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    error!("[SKU {}] 请求失败: {}", oem_sku, e);
                    return PageResult::TransportError(format!("请求失败: {}", e));
                }
            };

            let status = response.status().as_u16();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    error!("[SKU {}] 读取响应失败: {}", oem_sku, e);
                    return PageResult::TransportError(format!("读取响应失败: {}", e));
                }
            };

            if status != 200 {
                error!("[SKU {}] 接口返回错误 {}: {}", oem_sku, status, body);
                return PageResult::HttpError { status, body };
            }

            match serde_json::from_str::<ArticlesResponse>(&body) {
                Ok(parsed) => {
                    if parsed.articles.is_empty() {
                        PageResult::Empty
                    } else {
                        PageResult::Matched(parsed.articles)
                    }
                }
                Err(e) => {
                    error!("[SKU {}] 响应解析失败: {}", oem_sku, e);
                    PageResult::TransportError(format!("响应解析失败: {}", e))
                }
            }
        }
    }
}

/// 配件目录客户端工厂
///
/// 为每个并发任务创建独立的客户端实例
#[derive(Clone)]
pub struct TechdocClientFactory {
    config: Config,
}

impl TechdocClientFactory {
    /// 创建新的客户端工厂
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl FetcherFactory for TechdocClientFactory {
    type Fetcher = TechdocClient;

    fn create(&self) -> AppResult<TechdocClient> {
        TechdocClient::new(&self.config)
    }
}
