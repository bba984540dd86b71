use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use todo_server::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    todo_server::logging::init(&config.log_filter);

    let store = todo_server::open_store(&config)
        .await
        .context("failed to open todo store")?;
    match &config.data_file {
        Some(path) => info!(path = %path.display(), "using file store"),
        None => info!("using in-memory store"),
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    todo_server::run_until(listener, store, shutdown_signal())
        .await
        .context("server error")?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
