//! Centralized constants for the SQL Advisor MCP Server.
//!
//! Default values, environment variable names and the fixed response texts
//! returned by the tools live here so they are easy to find and change.

use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Environment variable holding the connect timeout in seconds.
pub const ENV_CONNECT_TIMEOUT: &str = "SQL_ADVISOR_CONNECT_TIMEOUT";

/// Environment variable holding the application name reported to the database.
pub const ENV_APPLICATION_NAME: &str = "SQL_ADVISOR_APPLICATION_NAME";

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout as Duration.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration =
    Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS);

/// Default application name reported to PostgreSQL.
pub const DEFAULT_APPLICATION_NAME: &str = "sql-advisor-mcp-server";

// =============================================================================
// Logging
// =============================================================================

/// Default tracing filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn,sql_advisor_mcp_server=info";

/// Maximum number of characters of SQL text written to the log.
pub const LOG_SQL_MAX_LEN: usize = 200;

// =============================================================================
// Resources
// =============================================================================

/// URI of the schema dump resource.
pub const SCHEMA_RESOURCE_URI: &str = "schema://main";

// =============================================================================
// Response Texts
// =============================================================================

/// Prefix of every textual error returned by a tool.
pub const ERROR_PREFIX: &str = "Error: ";

/// Returned by `run_query` for statements without a result shape.
pub const MSG_QUERY_EXECUTED: &str = "Query executed successfully";

/// Returned by `disconnect_database` after clearing an active connection.
pub const MSG_DISCONNECTED: &str = "Disconnected from the database successfully";

/// Returned by `disconnect_database` when nothing is connected.
pub const MSG_NO_ACTIVE_CONNECTION: &str = "No active connection to disconnect";

/// Separator between per-table blocks of the schema dump.
pub const SCHEMA_BLOCK_SEPARATOR: &str = "\n\n";
