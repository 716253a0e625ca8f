use anyhow::Result;
use paper_finder::{App, Config};
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    paper_finder::logger::init();

    // 加载配置
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        // 配置问题只降级功能，不中断启动
        warn!("{}", e);
    }

    // 初始化并运行应用
    App::initialize(config)?.run().await;

    Ok(())
}
