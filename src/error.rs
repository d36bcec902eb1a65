//! Error types for the SQL Advisor MCP Server.
//!
//! Every failure is one of a closed set of kinds (configuration, not connected,
//! driver) so the MCP layer can decide how to report it without matching on
//! message text.

use thiserror::Error;

/// Coarse classification of a [`ServerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad dialect, bad port, bad server configuration.
    Configuration,
    /// A data operation was attempted without an active connection.
    NotConnected,
    /// The database or its driver reported a failure.
    Driver,
}

/// Domain-specific errors for the SQL Advisor MCP Server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported database dialect
    #[error("Unsupported database type '{0}'. Use 'mysql' or 'postgresql'.")]
    UnsupportedDialect(String),

    /// No connection has been configured yet
    #[error("No database connection defined. Use 'connect_to_database' first.")]
    NotConnected,

    /// Connection error
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Connection attempt timed out
    #[error("Connection timeout: no response within {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// Query execution error
    #[error("Query execution error: {message}")]
    QueryExecution {
        message: String,
        sql_state: Option<String>,
    },
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a connection error with a source.
    pub fn connection_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an authentication error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a query execution error.
    pub fn query_error(msg: impl Into<String>) -> Self {
        Self::QueryExecution {
            message: msg.into(),
            sql_state: None,
        }
    }

    /// Create a query execution error carrying the database SQLSTATE.
    pub fn query_error_with_state(msg: impl Into<String>, state: Option<String>) -> Self {
        Self::QueryExecution {
            message: msg.into(),
            sql_state: state,
        }
    }

    /// Create a timeout error.
    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout {
            timeout_seconds: seconds,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::UnsupportedDialect(_) => ErrorKind::Configuration,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::Connection { .. }
            | Self::Authentication(_)
            | Self::Timeout { .. }
            | Self::QueryExecution { .. } => ErrorKind::Driver,
        }
    }

    /// Check if this is the "not connected" error.
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }

    /// Get a user-friendly suggestion for how to fix this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedDialect(_) => Some("Pass type 'mysql' or 'postgresql'"),
            Self::NotConnected => Some("Call connect_to_database before any other operation"),
            Self::Connection { .. } => Some("Check host, port, and network connectivity"),
            Self::Authentication(_) => Some("Verify your username and password are correct"),
            Self::Timeout { .. } => Some("Check that the server is reachable from this host"),
            _ => None,
        }
    }
}

/// Map a database error to a semantic [`ServerError`].
///
/// `code` is the SQLSTATE reported by the server when there is one.
pub fn from_database_error(code: Option<&str>, message: &str) -> ServerError {
    match code {
        // MySQL reports access denied as 28000, PostgreSQL uses 28000/28P01
        Some("28000") | Some("28P01") => ServerError::auth(message),
        // PostgreSQL: database does not exist
        Some("3D000") => ServerError::connection(message),
        _ => ServerError::query_error_with_state(message, code.map(str::to_string)),
    }
}

impl From<sqlx::Error> for ServerError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => {
                let code = db.code().map(|c| c.into_owned());
                from_database_error(code.as_deref(), db.message())
            }
            sqlx::Error::Io(io) => {
                ServerError::connection_with_source(format!("IO error: {io}"), io)
            }
            sqlx::Error::Tls(err) => ServerError::connection(format!("TLS error: {err}")),
            sqlx::Error::Protocol(msg) => {
                ServerError::connection(format!("Protocol error: {msg}"))
            }
            sqlx::Error::Configuration(err) => ServerError::config(err.to_string()),
            sqlx::Error::PoolTimedOut => ServerError::timeout(0),
            other => ServerError::query_error(other.to_string()),
        }
    }
}
