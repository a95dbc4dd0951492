use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
///
/// The data directory must be provided by the caller; the HTTP bind address
/// has a loopback default since the view API is a local companion surface.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the persisted records. Created if missing.
    pub data_dir: String,
    /// Bind address for the view API (e.g. "127.0.0.1:8787").
    pub http_addr: String,
    /// When set, serve MCP over TCP on this address instead of stdio.
    pub mcp_tcp_listen_addr: Option<String>,
}

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8787";

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `CALMA_DATA_DIR`: directory for the persisted store
    ///
    /// Optional:
    /// - `CALMA_HTTP_ADDR`: view API bind address (default 127.0.0.1:8787)
    /// - `CALMA_MCP_TCP_LISTEN_ADDR`: serve MCP over TCP instead of stdio
    pub fn from_env() -> Result<Self, AppError> {
        let data_dir = std::env::var("CALMA_DATA_DIR").map_err(|_| {
            AppError::Config("CALMA_DATA_DIR environment variable is required".to_string())
        })?;

        let http_addr =
            std::env::var("CALMA_HTTP_ADDR").unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());

        let mcp_tcp_listen_addr = std::env::var("CALMA_MCP_TCP_LISTEN_ADDR").ok();

        Ok(Self {
            data_dir,
            http_addr,
            mcp_tcp_listen_addr,
        })
    }
}
