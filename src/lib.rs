//! # OEM Catalog Pull
//!
//! 一个按 OEM 零件号批量拉取配件目录数据的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 请求体、响应结构、结果分类与批次累积器
//! - `Payload` - 请求模板，每个并发任务持有自己的副本
//! - `ItemOutcome` - 每个 SKU 恰好一个最终结果
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 页面抓取能力接口与 TecDoc 真实客户端
//! - `PageFetcher` / `FetcherFactory` - 每个并发任务独立的会话
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 只处理单个 SKU 或单个批次的落盘
//! - `harvest_sku` - 单 SKU 串行翻页采集
//! - `CsvStager` - 按类别落盘 CSV 暂存文件
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量采集处理器，管理批次和并发
//! - `warehouse/` - 暂存文件向数据仓库的交付接口
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod warehouse;

// 重新导出常用类型
pub use clients::{FetcherFactory, PageFetcher, TechdocClient, TechdocClientFactory};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    flatten_articles, load_worklist, Article, ArticleRecord, BatchAccumulator, ItemOutcome,
    NoMatchRecord, PageResult, Payload, ProblemRecord,
};
pub use orchestrator::{extract_from_api, App, HarvestStats};
pub use services::{harvest_sku, CsvStager};
pub use warehouse::{has_csv_files, load_staged, DryRunSink, WarehouseSink};
