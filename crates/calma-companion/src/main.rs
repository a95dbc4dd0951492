mod bridge;
mod config;
mod error;
mod http;
mod nav;
mod store;
mod views;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use calma_common::events::EventBus;
use calma_common::storage::JsonStore;

use bridge::CalmaToolServer;
use config::Config;
use store::CalmaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting calma companion");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        data_dir = %config.data_dir,
        http_addr = %config.http_addr,
        mcp_tcp = config.mcp_tcp_listen_addr.is_some(),
        "configuration loaded"
    );

    // 2. Open the persisted store and the event fan-out
    let store = Arc::new(CalmaStore::new(JsonStore::open(&config.data_dir)?));
    let events = Arc::new(EventBus::new());
    info!(
        recomendaciones_guardadas = store.has_recomendaciones(),
        recursos_guardados = store.read_recursos().len(),
        "store opened"
    );

    // 3. Start the view API
    let state = http::AppState {
        store: Arc::clone(&store),
        events: Arc::clone(&events),
    };
    let http_addr = config.http_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = http::serve(&http_addr, state).await {
            tracing::error!(error = %e, "view API error");
        }
    });

    // 4. Build the tool bridge and serve MCP
    let server = CalmaToolServer::new(store, events);

    if let Some(addr) = config.mcp_tcp_listen_addr {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
