//! The driver seam between the connection manager and vendor clients.
//!
//! A [`Driver`] opens one live [`ConnectionHandle`] for a configuration. The
//! handle runs statements and is closed by whoever opened it. No business
//! logic lives behind this seam.

use super::mysql::MySqlHandle;
use super::postgres::PgHandle;
use super::types::StatementOutcome;
use super::Dialect;
use crate::error::ServerError;
use crate::state::ConnectionConfig;
use async_trait::async_trait;

/// A live database session owned by a single operation.
#[async_trait]
pub trait ConnectionHandle: Send {
    /// Run one statement.
    ///
    /// With no `params` the text is sent as-is (so any statement the server
    /// accepts works); otherwise it is prepared and the params bound in order.
    async fn execute(
        &mut self,
        sql: &str,
        params: &[String],
    ) -> Result<StatementOutcome, ServerError>;

    /// Close the session. Never fails; errors are only logged.
    async fn close(self: Box<Self>);
}

/// Opens connections for a configuration.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn open(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn ConnectionHandle>, ServerError>;
}

/// Production driver backed by sqlx, dispatching on the configured dialect.
#[derive(Debug, Clone)]
pub struct SqlxDriver {
    application_name: String,
}

impl SqlxDriver {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
        }
    }
}

#[async_trait]
impl Driver for SqlxDriver {
    async fn open(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn ConnectionHandle>, ServerError> {
        let handle: Box<dyn ConnectionHandle> = match config.dialect {
            Dialect::MySql => Box::new(MySqlHandle::open(config).await?),
            Dialect::PostgreSql => {
                Box::new(PgHandle::open(config, &self.application_name).await?)
            }
        };
        Ok(handle)
    }
}

/// Parse the string-typed port of a configuration.
pub(crate) fn parse_port(port: &str) -> Result<u16, ServerError> {
    port.trim()
        .parse::<u16>()
        .map_err(|_| ServerError::config(format!("Invalid port '{port}'")))
}

/// Whether a statement that returned no rows still had a result shape.
///
/// Only consulted when the server sent zero rows, where the wire protocol
/// alone cannot tell an empty SELECT from an UPDATE.
pub(crate) fn has_result_shape(sql: &str) -> bool {
    let keyword = leading_keyword(sql).to_ascii_uppercase();
    matches!(
        keyword.as_str(),
        "SELECT" | "SHOW" | "DESCRIBE" | "DESC" | "EXPLAIN" | "WITH" | "VALUES" | "TABLE"
    )
}

/// First keyword of a statement, skipping whitespace, comments and parentheses.
fn leading_keyword(sql: &str) -> &str {
    let mut rest = sql;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            break;
        }
    }
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Truncate a string for logging purposes.
pub(crate) fn truncate_for_log(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
