//! SQL Advisor MCP Server entry point.
//!
//! This binary starts the MCP server using stdio transport for integration
//! with Claude Desktop, Cursor, and other MCP clients. Database credentials
//! are supplied later through the `connect_to_database` tool.

use anyhow::Result;
use rmcp::ServiceExt;
use sql_advisor_mcp_server::constants::DEFAULT_LOG_FILTER;
use sql_advisor_mcp_server::{Config, SqlAdvisorServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is reserved for JSON-RPC)
    init_logging();

    let version = env!("CARGO_PKG_VERSION");
    eprintln!("SQL Advisor MCP Server v{version} starting...");
    eprintln!("Transport: stdio");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] {}", info);
    }));

    let config = Config::from_env()?;
    info!(
        "Connect timeout {}s, application name '{}'",
        config.connect_timeout.as_secs(),
        config.application_name
    );

    let server = SqlAdvisorServer::new(config);
    let handle = server.clone();
    eprintln!("Server initialized. Ready to accept requests...");

    let transport = rmcp::transport::stdio();
    let service = server.serve(transport).await?;

    tokio::select! {
        quit_reason = service.waiting() => {
            match quit_reason {
                Ok(reason) => eprintln!("Service stopped: {reason:?}"),
                Err(e) => eprintln!("Service error: {e}"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Shutdown signal received");
        }
    }

    // Connections never outlive a request, so only the stored credentials remain.
    handle.manager().disconnect().await;
    eprintln!("Server shutdown complete");

    Ok(())
}

/// Initialize tracing subscriber with stderr output.
///
/// Logs MUST go to stderr because stdout is used for JSON-RPC communication.
fn init_logging() {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
