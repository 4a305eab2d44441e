use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 配件目录接口地址
    pub endpoint: String,
    /// 接口访问密钥
    pub api_key: String,
    /// 数据供应方编号
    pub provider: String,
    /// 配件适用国家代码
    pub article_country: String,
    /// 返回语言
    pub lang: String,
    /// 搜索类型
    pub search_type: u32,
    /// 每页返回的配件数量
    pub per_page: u32,
    /// 同时发起的请求数量
    pub max_concurrent_requests: usize,
    /// 每批处理的 SKU 数量（每批结束后落盘一次）
    pub batch_size: usize,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 暂存文件根目录
    pub stage_dir: String,
    /// 工作清单文件路径（每行一个 OEM SKU）
    pub worklist_path: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint:
                "https://webservice.tecalliance.services/pegasus-3-0/services/TecdocToCatDLB.jsonEndpoint"
                    .to_string(),
            api_key: String::new(),
            provider: "22610".to_string(),
            article_country: "AE".to_string(),
            lang: "en".to_string(),
            search_type: 1,
            per_page: 100,
            max_concurrent_requests: 10,
            batch_size: 5000,
            request_timeout_secs: 30,
            stage_dir: "data".to_string(),
            worklist_path: "worklist.txt".to_string(),
            verbose_logging: false,
        }
    }
}

/// 配置文件中的可选字段（未出现的字段沿用默认值）
#[derive(Debug, Deserialize)]
struct FileConfig {
    endpoint: Option<String>,
    api_key: Option<String>,
    provider: Option<String>,
    article_country: Option<String>,
    lang: Option<String>,
    search_type: Option<u32>,
    per_page: Option<u32>,
    max_concurrent_requests: Option<usize>,
    batch_size: Option<usize>,
    request_timeout_secs: Option<u64>,
    stage_dir: Option<String>,
    worklist_path: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 加载配置
    ///
    /// 优先级：环境变量 > 配置文件 > 默认值
    ///
    /// # 参数
    /// - `config_path`: 配置文件路径，`None` 时使用 `config.toml`
    ///
    /// # 返回
    /// 返回合并后的配置
    pub fn load(config_path: Option<&str>) -> AppResult<Self> {
        let mut config = Self::default();

        let path = config_path.unwrap_or("config.toml");
        if Path::new(path).exists() {
            config = config.merge_file(path)?;
        }

        Ok(config.apply_env())
    }

    /// 合并配置文件中的字段
    fn merge_file(mut self, path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path, e))?;

        let file_config: FileConfig = toml::from_str(&content)
            .map_err(|e| AppError::config_file_parse_failed(path, e))?;

        if let Some(v) = file_config.endpoint { self.endpoint = v; }
        if let Some(v) = file_config.api_key { self.api_key = v; }
        if let Some(v) = file_config.provider { self.provider = v; }
        if let Some(v) = file_config.article_country { self.article_country = v; }
        if let Some(v) = file_config.lang { self.lang = v; }
        if let Some(v) = file_config.search_type { self.search_type = v; }
        if let Some(v) = file_config.per_page { self.per_page = v; }
        if let Some(v) = file_config.max_concurrent_requests { self.max_concurrent_requests = v; }
        if let Some(v) = file_config.batch_size { self.batch_size = v; }
        if let Some(v) = file_config.request_timeout_secs { self.request_timeout_secs = v; }
        if let Some(v) = file_config.stage_dir { self.stage_dir = v; }
        if let Some(v) = file_config.worklist_path { self.worklist_path = v; }
        if let Some(v) = file_config.verbose_logging { self.verbose_logging = v; }

        Ok(self)
    }

    /// 应用环境变量覆盖
    pub fn apply_env(self) -> Self {
        Self {
            endpoint: std::env::var("TECHDOC_ENDPOINT").unwrap_or(self.endpoint),
            api_key: std::env::var("TECHDOC_API_KEY").unwrap_or(self.api_key),
            provider: std::env::var("TECHDOC_PROVIDER").unwrap_or(self.provider),
            article_country: std::env::var("ARTICLE_COUNTRY").unwrap_or(self.article_country),
            lang: std::env::var("ARTICLE_LANG").unwrap_or(self.lang),
            search_type: std::env::var("SEARCH_TYPE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.search_type),
            per_page: std::env::var("PER_PAGE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.per_page),
            max_concurrent_requests: std::env::var("MAX_CONCURRENT_REQUESTS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_concurrent_requests),
            batch_size: std::env::var("BATCH_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.batch_size),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            stage_dir: std::env::var("STAGE_DIR").unwrap_or(self.stage_dir),
            worklist_path: std::env::var("WORKLIST_PATH").unwrap_or(self.worklist_path),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }
}
