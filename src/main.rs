use anyhow::Result;
use clap::Parser;
use shift_autoredeem::infrastructure::logger;
use shift_autoredeem::{run, AppConfig, ConsoleReporter};
use tracing::debug;

#[tokio::main]
async fn main() {
    if let Err(e) = real_main().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    println!("all done");
}

async fn real_main() -> Result<()> {
    // 允许从 .env 读取凭证
    dotenv::dotenv().ok();

    let cfg = AppConfig::parse();
    logger::init(cfg.log_format);
    debug!(config = ?cfg, "configuration loaded");

    let reporter = ConsoleReporter::new();
    run(&cfg, &reporter).await?;
    Ok(())
}
