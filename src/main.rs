use anyhow::Result;
use oem_catalog_pull::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::load(None)?;

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
