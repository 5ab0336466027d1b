use anyhow::{bail, Result};
use route_planner::utils::logging;
use route_planner::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::load()?;

    // 初始化并运行应用
    let outcome = App::initialize(config)?.run().await?;
    if outcome.all_failed() {
        bail!("两条路线都未能构建");
    }

    Ok(())
}
