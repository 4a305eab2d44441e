//! 结果分类模型
//!
//! ## 职责
//!
//! - 描述单页请求的分类结果
//! - 描述单个 SKU 分页结束后的最终结果
//! - 承接一个批次内三类结果的累积

use crate::models::article::{Article, ArticleRecord};
use serde::Serialize;

/// 单页请求的分类结果
#[derive(Debug, Clone)]
pub enum PageResult {
    /// 200 且 `articles` 非空
    Matched(Vec<Article>),
    /// 200 且 `articles` 为空
    Empty,
    /// HTTP 状态码非 200
    HttpError { status: u16, body: String },
    /// 网络层失败（连接、超时、响应读取或解析失败）
    TransportError(String),
}

/// 单个 SKU 的最终结果
///
/// 每个 SKU 在一次运行中恰好产生一个变体。
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// 至少命中一页，携带展平后的全部记录
    Matched(Vec<ArticleRecord>),
    /// 第一页即为空
    NoMatch(NoMatchRecord),
    /// 请求出错，携带错误明细
    Problem(ProblemRecord),
}

/// 未命中记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoMatchRecord {
    #[serde(rename = "OEM SKU")]
    pub oem_sku: String,
}

/// 错误记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemRecord {
    #[serde(rename = "OEM SKU")]
    pub oem_sku: String,
    #[serde(rename = "Error")]
    pub error: String,
}

/// 批次累积器
///
/// 批次的并发阶段只追加，落盘时一次性取走。
/// 合并只发生在协调任务中，不会被多个任务同时写入。
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    pub matches: Vec<ArticleRecord>,
    pub no_responses: Vec<NoMatchRecord>,
    pub problems: Vec<ProblemRecord>,
}

impl BatchAccumulator {
    /// 创建空的累积器
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并一个 SKU 的最终结果
    pub fn merge(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Matched(records) => self.matches.extend(records),
            ItemOutcome::NoMatch(record) => self.no_responses.push(record),
            ItemOutcome::Problem(record) => self.problems.push(record),
        }
    }

    /// 三类结果是否全部为空
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.no_responses.is_empty() && self.problems.is_empty()
    }
}
