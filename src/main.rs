use cluster_dispatch::config::NodeConfig;
use cluster_dispatch::config::node::load_wan_consumers;
use cluster_dispatch::security::AllowAll;
use cluster_dispatch::server::{self, Node};
use cluster_dispatch::wan;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cluster-dispatch");

    let config = match NodeConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("{}", NodeConfig::usage(program));
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    tracing::info!("Starting node on {}", config.bind_addr);
    tracing::info!(
        "{} partitions on {} workers, cluster version {}",
        config.partition_count,
        config.partition_threads,
        config.cluster_version
    );

    // 1. Services, partition workers and message tasks:
    let node = Node::start(&config, Arc::new(AllowAll));

    // 2. Bootstrap WAN consumers:
    if let Some(path) = &config.wan_consumers_file {
        let entries = load_wan_consumers(path)?;
        wan::install_consumers(&node.ctx, entries).await?;
    }

    // 3. HTTP server:
    let app = server::router(node);

    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
