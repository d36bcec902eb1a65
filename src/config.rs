//! Configuration management for the SQL Advisor MCP Server.
//!
//! Server-level settings are loaded from environment variables following the
//! 12-factor app pattern. Database credentials are NOT configuration: they are
//! supplied at runtime through the `connect_to_database` tool and live only in
//! process memory.

use crate::constants::{
    DEFAULT_APPLICATION_NAME, DEFAULT_CONNECTION_TIMEOUT, ENV_APPLICATION_NAME,
    ENV_CONNECT_TIMEOUT,
};
use crate::error::ServerError;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound on establishing a database connection.
    pub connect_timeout: Duration,

    /// Application name reported to the database (PostgreSQL only).
    pub application_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECTION_TIMEOUT,
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SQL_ADVISOR_CONNECT_TIMEOUT`: Connection timeout in seconds (default: 30)
    /// - `SQL_ADVISOR_APPLICATION_NAME`: Application name (default: sql-advisor-mcp-server)
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let connect_timeout = lookup(ENV_CONNECT_TIMEOUT)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout);

        let application_name = lookup(ENV_APPLICATION_NAME)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.application_name);

        let config = Self {
            connect_timeout,
            application_name,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every connect fail.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.connect_timeout.is_zero() {
            return Err(ServerError::config(format!(
                "{ENV_CONNECT_TIMEOUT} must be greater than zero"
            )));
        }
        Ok(())
    }
}
