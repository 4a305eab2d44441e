use oem_catalog_pull::{
    harvest_sku, logger, Config, ItemOutcome, Payload, TechdocClient,
};

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_fetch_single_sku_live() {
    // 初始化日志
    logger::init();

    // 加载配置（需要设置 TECHDOC_API_KEY）
    let config = Config::load(None).expect("加载配置失败");
    assert!(!config.api_key.is_empty(), "请先设置 TECHDOC_API_KEY");

    // 创建客户端
    let client = TechdocClient::new(&config).expect("创建客户端失败");

    // 注意：请根据实际情况替换为有效的 OEM SKU
    let template = Payload::build(&config, config.search_type);
    let outcome = harvest_sku(&client, &template, "04465-42160").await;

    match outcome {
        ItemOutcome::Matched(records) => {
            println!("命中 {} 行记录", records.len());
            assert!(!records.is_empty());
        }
        ItemOutcome::NoMatch(record) => {
            println!("未命中: {}", record.oem_sku);
        }
        ItemOutcome::Problem(record) => {
            panic!("请求出错: {}", record.error);
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_config_load() {
    // 初始化日志
    logger::init();

    // 测试配置加载
    let config = Config::load(None).expect("加载配置失败");

    println!("接口地址: {}", config.endpoint);
    println!("批次大小: {}", config.batch_size);
    assert!(config.batch_size > 0);
}
