//! 批量采集处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责工作清单的批量采集和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：准备暂存目录，输出启动信息
//! 2. **批量加载**：读取工作清单（`Vec<String>` 形式的 OEM SKU 列表）
//! 3. **并发控制**：使用 Semaphore 限制同时在途的请求数量
//! 4. **分批处理**：按固定批次大小处理，每批完成后落盘再开始下一批
//! 5. **失败隔离**：单个 SKU 的失败折算为错误记录，不影响同批其余 SKU
//! 6. **全局统计**：汇总所有 SKU 的采集结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个 SKU 的翻页细节
//! - **批内并发、批间串行**：并发只存在于一个批次内部
//! - **结果按完成顺序合并**：合并发生在协调任务中，累积器不需要加锁
//! - **向下委托**：委托 sku_harvester 处理单个 SKU

use crate::clients::{FetcherFactory, TechdocClientFactory};
use crate::config::Config;
use crate::models::{load_worklist, BatchAccumulator, ItemOutcome, Payload, ProblemRecord};
use crate::services::{harvest_sku, CsvStager};
use crate::warehouse::{self, DryRunSink};
use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use std::fs;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.stage_dir)?;

        log_startup(&config);

        Ok(Self { config })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载工作清单
        let worklist = load_worklist(&self.config.worklist_path).await?;

        if worklist.is_empty() {
            info!("ℹ️ 没有检测到新的 OEM SKU，程序结束");
            return Ok(());
        }

        // 采集所有 SKU
        let factory = TechdocClientFactory::new(&self.config);
        let stats = extract_from_api(&factory, &worklist, &self.config).await?;

        // 输出最终统计
        print_final_stats(&stats);

        // 将已暂存的匹配与未命中记录交给数据仓库
        let sink = DryRunSink::new();
        warehouse::load_staged(&sink, &self.config).await;

        Ok(())
    }
}

/// 采集统计
#[derive(Debug, Default)]
pub struct HarvestStats {
    pub total: usize,
    pub matched: usize,
    pub no_match: usize,
    pub problems: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    matched: usize,
    no_match: usize,
    problems: usize,
}

/// 采集整个工作清单
///
/// 工作清单被切成连续的批次（最后一批可能不足一批），
/// 批次之间串行执行，每批结束后立即落盘并丢弃累积器。
/// 落盘失败只记录日志，不中断运行。
///
/// # 参数
/// - `factory`: 抓取器工厂，每个并发任务获得独立实例
/// - `worklist`: 去重后的 OEM SKU 列表
/// - `config`: 配置
///
/// # 返回
/// 返回整个运行的采集统计
pub async fn extract_from_api<F: FetcherFactory>(
    factory: &F,
    worklist: &[String],
    config: &Config,
) -> Result<HarvestStats> {
    let batch_size = config.batch_size.max(1);
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_requests.max(1)));
    let stager = CsvStager::new(&config.stage_dir, batch_size);
    let template = Payload::build(config, config.search_type);

    let total = worklist.len();
    let mut stats = HarvestStats {
        total,
        ..Default::default()
    };

    // 分批处理
    for batch_start in (0..total).step_by(batch_size) {
        let batch_end = (batch_start + batch_size).min(total);
        let batch = &worklist[batch_start..batch_end];
        let batch_num = (batch_start / batch_size) + 1;
        let total_batches = (total + batch_size - 1) / batch_size;

        log_batch_start(batch_num, total_batches, batch_start, batch_end, total);

        // 处理本批
        let (mut accumulator, batch_result) =
            process_batch(factory, batch, &template, config, semaphore.clone()).await?;

        stats.matched += batch_result.matched;
        stats.no_match += batch_result.no_match;
        stats.problems += batch_result.problems;

        // 落盘本批结果
        let staged = stager.flush(&mut accumulator, batch_end);

        log_batch_complete(batch_num, &batch_result, staged.len());
    }

    info!("✅ 采集流程结束");

    Ok(stats)
}

/// 处理单个批次
///
/// 每个 SKU 一个任务，任务数量由 Semaphore 限制。
/// 每个任务持有独立的抓取器实例和独立的请求体副本。
/// 结果按完成顺序合并进累积器，不保证与提交顺序一致。
async fn process_batch<F: FetcherFactory>(
    factory: &F,
    batch: &[String],
    template: &Payload,
    config: &Config,
    semaphore: Arc<Semaphore>,
) -> Result<(BatchAccumulator, BatchResult)> {
    let mut accumulator = BatchAccumulator::new();
    let mut result = BatchResult::default();
    let mut tasks = FuturesUnordered::new();

    // 为本批创建并发任务
    for oem_sku in batch {
        let fetcher = match factory.create() {
            Ok(fetcher) => fetcher,
            Err(e) => {
                // 工厂失败只影响当前 SKU
                error!("[SKU {}] ❌ 创建抓取器失败: {}", oem_sku, e);
                result.problems += 1;
                accumulator.merge(ItemOutcome::Problem(ProblemRecord {
                    oem_sku: oem_sku.clone(),
                    error: format!("创建抓取器失败: {}", e),
                }));
                continue;
            }
        };

        let permit = semaphore.clone().acquire_owned().await?;
        let sku_task = oem_sku.clone();
        let template_task = template.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            harvest_sku(&fetcher, &template_task, &sku_task).await
        });

        let sku_wrap = oem_sku.clone();
        tasks.push(async move { (sku_wrap, handle.await) });
    }

    // 按完成顺序收集本批结果
    while let Some((oem_sku, joined)) = tasks.next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("[SKU {}] ❌ 任务执行失败: {}", oem_sku, e);
                ItemOutcome::Problem(ProblemRecord {
                    oem_sku: oem_sku.clone(),
                    error: format!("任务执行失败: {}", e),
                })
            }
        };

        match &outcome {
            ItemOutcome::Matched(_) => result.matched += 1,
            ItemOutcome::NoMatch(_) => result.no_match += 1,
            ItemOutcome::Problem(record) => {
                if config.verbose_logging {
                    warn!("[SKU {}] ⚠️ 记为问题项: {}", oem_sku, record.error);
                }
                result.problems += 1;
            }
        }

        accumulator.merge(outcome);
    }

    Ok((accumulator, result))
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 配件目录批量采集模式");
    info!("📊 最大并发请求数: {}", config.max_concurrent_requests);
    info!("📦 批次大小: {}", config.batch_size);
    info!("📁 暂存目录: {}", config.stage_dir);
    info!("{}", "=".repeat(60));
}

fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批 SKU 索引: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(batch_num: usize, result: &BatchResult, staged_files: usize) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 批完成: 命中 {} / 未命中 {} / 问题 {}，落盘 {} 个文件",
        batch_num, result.matched, result.no_match, result.problems, staged_files
    );
    info!("{}", "─".repeat(60));
}

fn print_final_stats(stats: &HarvestStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部采集完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 命中: {}/{}", stats.matched, stats.total);
    info!("⭕ 未命中: {}", stats.no_match);
    info!("❌ 问题项: {}", stats.problems);
    info!("{}", "=".repeat(60));
}
