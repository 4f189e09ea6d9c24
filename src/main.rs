// src/main.rs

use clap::Parser;
use std::sync::Arc;
use tidekv::{config, persistence, server, store::Store};
use tokio::net::TcpListener;

/// In-memory key-value server speaking a Redis-like protocol
#[derive(Parser, Debug)]
#[command(name = "tidekv", version)]
struct Args {
    /// 监听端口，覆盖配置文件中的 port
    #[arg(short, long)]
    port: Option<u16>,
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = config::load(&args.config)?;
    let port = args.port.unwrap_or(cfg.port);

    // 组合根持有唯一的 Store 实例，按引用共享给各层
    let store = Arc::new(Store::new());

    // 启动时加载快照；失败则从空库开始
    match persistence::load_from_disk(&store, &cfg.snapshot_path) {
        Ok(()) => println!("Data loaded from {}", cfg.snapshot_path),
        Err(_) => println!("No snapshot found or load failed; starting fresh."),
    }

    // 周期快照任务
    tokio::spawn(persistence::snapshot_loop(
        store.clone(),
        cfg.snapshot_path.clone().into(),
        cfg.snapshot_interval_secs,
    ));

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    server::run(
        listener,
        store,
        cfg.max_connections,
        cfg.snapshot_path.clone().into(),
        tokio::signal::ctrl_c(),
    )
    .await
}
