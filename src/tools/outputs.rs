//! JSON payloads returned by the connection tools.

use crate::constants::{MSG_DISCONNECTED, MSG_NO_ACTIVE_CONNECTION};
use crate::database::{ConnectSummary, Dialect};
use serde::Serialize;

/// Result of `connect_to_database`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConnectResult {
    Success {
        database_type: Dialect,
        database: String,
        tables: Vec<String>,
    },
    Error {
        message: String,
    },
}

impl From<ConnectSummary> for ConnectResult {
    fn from(summary: ConnectSummary) -> Self {
        ConnectResult::Success {
            database_type: summary.dialect,
            database: summary.database,
            tables: summary.tables,
        }
    }
}

/// Result of `disconnect_database`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DisconnectResult {
    Success { message: &'static str },
    Noop { message: &'static str },
}

impl DisconnectResult {
    pub fn from_outcome(was_connected: bool) -> Self {
        if was_connected {
            DisconnectResult::Success {
                message: MSG_DISCONNECTED,
            }
        } else {
            DisconnectResult::Noop {
                message: MSG_NO_ACTIVE_CONNECTION,
            }
        }
    }
}
