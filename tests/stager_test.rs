//! CSV 暂存测试

use oem_catalog_pull::{
    ArticleRecord, BatchAccumulator, CsvStager, DryRunSink, ItemOutcome, NoMatchRecord,
    ProblemRecord, WarehouseSink,
};
use tempfile::TempDir;

fn record(oem_sku: &str) -> ArticleRecord {
    ArticleRecord {
        oem_sku: oem_sku.to_string(),
        data_supplier_id: Some(520),
        article_number: Some("A1".to_string()),
        mfr_id: Some(30),
        mfr_name: Some("FEBI BILSTEIN".to_string()),
        match_type: None,
        matched_number: None,
        generic_article_id: Some(101),
        generic_article_description: Some("Brake Pad Set".to_string()),
        legacy_article_id: None,
        oem_article_number: None,
        oem_mfr_id: None,
        oem_mfr_name: None,
    }
}

#[test]
fn test_empty_accumulator_writes_nothing() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let stager = CsvStager::new(tmp.path(), 5000);

    let mut accumulator = BatchAccumulator::new();
    let staged = stager.flush(&mut accumulator, 5000);

    assert!(staged.is_empty(), "空的累积器不应该产生文件");
    assert!(!tmp.path().join("oem_matches").exists());
    assert!(!tmp.path().join("no_responses").exists());
    assert!(!tmp.path().join("errors").exists());
}

#[test]
fn test_single_match_writes_one_file_with_record() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let stager = CsvStager::new(tmp.path(), 5000);

    let mut accumulator = BatchAccumulator::new();
    accumulator.merge(ItemOutcome::Matched(vec![record("OEM-001")]));

    let staged = stager.flush(&mut accumulator, 5000);

    assert_eq!(staged.len(), 1, "应该恰好产生一个文件");
    assert!(accumulator.is_empty(), "落盘后累积器应该被清空");

    let path = &staged[0];
    let name = path.file_name().unwrap().to_string_lossy();
    assert!(
        name.starts_with("oem_matches_0_5000_"),
        "文件名应该携带类别和索引区间: {}",
        name
    );
    assert!(name.ends_with(".csv"));

    let content = std::fs::read_to_string(path).expect("读取暂存文件失败");
    assert!(content.contains("OEM SKU"), "表头应该包含 SKU 列");
    assert!(content.contains("OEM-001"));
    assert!(content.contains("FEBI BILSTEIN"));
}

#[test]
fn test_each_category_gets_its_own_file() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let stager = CsvStager::new(tmp.path(), 5000);

    let mut accumulator = BatchAccumulator::new();
    accumulator.merge(ItemOutcome::NoMatch(NoMatchRecord {
        oem_sku: "OEM-002".to_string(),
    }));
    accumulator.merge(ItemOutcome::Problem(ProblemRecord {
        oem_sku: "OEM-003".to_string(),
        error: "HTTP 500: boom".to_string(),
    }));

    let staged = stager.flush(&mut accumulator, 5000);

    assert_eq!(staged.len(), 2);
    assert!(tmp.path().join("no_responses").exists());
    assert!(tmp.path().join("errors").exists());
    assert!(!tmp.path().join("oem_matches").exists());

    let errors = std::fs::read_to_string(
        staged
            .iter()
            .find(|p| p.to_string_lossy().contains("errors"))
            .unwrap(),
    )
    .expect("读取错误文件失败");
    assert!(errors.contains("Error"), "错误文件应该有 Error 列");
    assert!(errors.contains("HTTP 500: boom"));
}

#[test]
fn test_index_window_reflects_batch_position() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let stager = CsvStager::new(tmp.path(), 5000);

    let mut accumulator = BatchAccumulator::new();
    accumulator.merge(ItemOutcome::Matched(vec![record("OEM-004")]));

    let staged = stager.flush(&mut accumulator, 10000);

    let name = staged[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(
        name.starts_with("oem_matches_5000_10000_"),
        "第二批的索引区间不正确: {}",
        name
    );
}

#[test]
fn test_short_last_batch_window_is_clamped() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let stager = CsvStager::new(tmp.path(), 5000);

    let mut accumulator = BatchAccumulator::new();
    accumulator.merge(ItemOutcome::Matched(vec![record("OEM-005")]));

    // 工作清单不足一批时起点被压到 0
    let staged = stager.flush(&mut accumulator, 1200);

    let name = staged[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(
        name.starts_with("oem_matches_0_1200_"),
        "不足一批时的索引区间不正确: {}",
        name
    );
}

#[test]
fn test_no_temporary_files_left_behind() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    let stager = CsvStager::new(tmp.path(), 5000);

    let mut accumulator = BatchAccumulator::new();
    accumulator.merge(ItemOutcome::Matched(vec![record("OEM-006")]));
    stager.flush(&mut accumulator, 5000);

    let leftovers: Vec<_> = std::fs::read_dir(tmp.path().join("oem_matches"))
        .expect("读取类别目录失败")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".tmp"))
        .collect();

    assert!(leftovers.is_empty(), "不应该残留临时文件: {:?}", leftovers);
}

#[tokio::test]
async fn test_dry_run_sink_rejects_empty_dir() {
    let tmp = TempDir::new().expect("创建临时目录失败");

    let sink = DryRunSink::new();
    let result = sink.bulk_load("MATCH", tmp.path()).await;

    assert!(result.is_err(), "没有暂存文件时装载应该报错");
}

#[tokio::test]
async fn test_dry_run_sink_accepts_staged_dir() {
    let tmp = TempDir::new().expect("创建临时目录失败");
    std::fs::write(tmp.path().join("oem_matches_0_5000_20240101_000000.csv"), "OEM SKU\nX\n")
        .expect("写入测试文件失败");

    let sink = DryRunSink::new();
    let result = sink.bulk_load("MATCH", tmp.path()).await;

    assert!(result.is_ok(), "有暂存文件时装载应该成功");
}
