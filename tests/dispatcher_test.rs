//! 批量编排流程测试
//!
//! 覆盖批次切分、失败隔离、落盘节奏和仓库交付，不访问网络。

use oem_catalog_pull::{
    extract_from_api, load_staged, load_worklist, AppResult, Article, Config, FetcherFactory,
    PageFetcher, PageResult, Payload, WarehouseSink,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// 按 SKU 前缀决定行为的抓取器
///
/// - `HIT-*`: 第 1 页命中一个配件，第 2 页为空
/// - `FAIL-*`: 网络层失败
/// - 其余: 第 1 页即为空
struct PrefixFetcher;

fn article(article_number: &str) -> Article {
    Article {
        data_supplier_id: Some(520),
        article_number: Some(article_number.to_string()),
        mfr_id: Some(30),
        mfr_name: Some("FEBI BILSTEIN".to_string()),
        generic_articles: vec![],
        oem_numbers: vec![],
        search_query_matches: vec![],
    }
}

impl PageFetcher for PrefixFetcher {
    fn fetch_page(
        &self,
        _payload: &mut Payload,
        oem_sku: &str,
        page: u32,
    ) -> impl Future<Output = PageResult> + Send {
        let result = if oem_sku.starts_with("FAIL") {
            PageResult::TransportError("连接超时".to_string())
        } else if oem_sku.starts_with("HIT") && page == 1 {
            PageResult::Matched(vec![article("A1")])
        } else {
            PageResult::Empty
        };
        async move { result }
    }
}

struct PrefixFactory;

impl FetcherFactory for PrefixFactory {
    type Fetcher = PrefixFetcher;

    fn create(&self) -> AppResult<PrefixFetcher> {
        Ok(PrefixFetcher)
    }
}

/// 构造指向临时暂存目录的配置
fn test_config(stage_dir: &Path, batch_size: usize) -> Config {
    Config {
        stage_dir: stage_dir.to_string_lossy().to_string(),
        batch_size,
        max_concurrent_requests: 10,
        ..Config::default()
    }
}

/// 统计某个类别目录下的 CSV 文件
fn csv_files(stage_dir: &Path, category: &str) -> Vec<PathBuf> {
    let dir = stage_dir.join(category);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("csv"))
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn test_single_failure_does_not_abort_batch() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let config = test_config(tmp.path(), 100);

    let worklist = vec![
        "HIT-001".to_string(),
        "FAIL-002".to_string(),
        "MISS-003".to_string(),
    ];

    let stats = extract_from_api(&PrefixFactory, &worklist, &config)
        .await
        .expect("采集流程不应该失败");

    assert_eq!(stats.total, 3);
    assert_eq!(stats.matched, 1, "失败的 SKU 不应该影响命中的 SKU");
    assert_eq!(stats.no_match, 1);
    assert_eq!(stats.problems, 1, "失败的 SKU 应该记为问题项");

    assert_eq!(csv_files(tmp.path(), "oem_matches").len(), 1);
    assert_eq!(csv_files(tmp.path(), "no_responses").len(), 1);
    assert_eq!(csv_files(tmp.path(), "errors").len(), 1);
}

#[tokio::test]
async fn test_worklist_splits_into_expected_batches() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let config = test_config(tmp.path(), 5000);

    let worklist: Vec<String> = (0..12000).map(|i| format!("MISS-{}", i)).collect();

    let stats = extract_from_api(&PrefixFactory, &worklist, &config)
        .await
        .expect("采集流程不应该失败");

    assert_eq!(stats.total, 12000);
    assert_eq!(stats.no_match, 12000);

    // 12000 个 SKU 按 5000 一批应该落盘 3 次
    let files = csv_files(tmp.path(), "no_responses");
    assert_eq!(files.len(), 3, "应该恰好产生 3 个未命中文件");

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert!(
        names.iter().any(|n| n.starts_with("no_responses_0_5000_")),
        "第 1 批的索引区间不正确: {:?}",
        names
    );
    assert!(
        names.iter().any(|n| n.starts_with("no_responses_5000_10000_")),
        "第 2 批的索引区间不正确: {:?}",
        names
    );
    assert!(
        names
            .iter()
            .any(|n| n.starts_with("no_responses_10000_12000_")),
        "最后一批应该只有 2000 个 SKU: {:?}",
        names
    );
}

#[tokio::test]
async fn test_load_worklist_dedups_and_keeps_order() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let path = tmp.path().join("worklist.txt");
    std::fs::write(&path, "SKU-A\n\n  SKU-B  \nSKU-A\nSKU-C\n").expect("写入工作清单失败");

    let skus = load_worklist(path.to_str().unwrap())
        .await
        .expect("加载工作清单失败");

    assert_eq!(skus, vec!["SKU-A", "SKU-B", "SKU-C"]);
}

#[tokio::test]
async fn test_load_worklist_missing_file_fails() {
    let result = load_worklist("/nonexistent/worklist.txt").await;
    assert!(result.is_err(), "文件不存在时应该报错");
}

/// 记录每次装载调用的表名
struct RecordingSink {
    calls: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl WarehouseSink for RecordingSink {
    fn bulk_load(
        &self,
        table_name: &str,
        _staging_dir: &Path,
    ) -> impl Future<Output = AppResult<()>> + Send {
        self.calls.lock().unwrap().push(table_name.to_string());
        async move { Ok(()) }
    }
}

#[tokio::test]
async fn test_load_staged_offers_only_nonempty_categories() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let config = test_config(tmp.path(), 100);

    // 只产生未命中记录
    let worklist = vec!["MISS-1".to_string(), "MISS-2".to_string()];
    extract_from_api(&PrefixFactory, &worklist, &config)
        .await
        .expect("采集流程不应该失败");

    let sink = RecordingSink::new();
    load_staged(&sink, &config).await;

    let calls = sink.calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["NO_MATCH"], "空的类别不应该交给装载方");
}

#[tokio::test]
async fn test_load_staged_offers_both_tables_when_present() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let config = test_config(tmp.path(), 100);

    let worklist = vec!["HIT-1".to_string(), "MISS-2".to_string()];
    extract_from_api(&PrefixFactory, &worklist, &config)
        .await
        .expect("采集流程不应该失败");

    let sink = RecordingSink::new();
    load_staged(&sink, &config).await;

    let calls = sink.calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["MATCH", "NO_MATCH"]);
}
