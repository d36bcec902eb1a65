//! Connection state: which database the server is currently pointed at.
//!
//! There is at most one active configuration per server. Only the connect and
//! disconnect operations change it; every other operation takes a snapshot.

use crate::database::Dialect;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Shared state wrapper type.
///
/// The lock is never held across an `.await`.
pub type SharedState = Arc<RwLock<ConnectionState>>;

/// Create a new shared state instance in the `Unset` state.
pub fn new_shared_state() -> SharedState {
    Arc::new(RwLock::new(ConnectionState::default()))
}

/// Credentials and location of the database to connect to.
///
/// Every field except the dialect is kept as a string, exactly as the caller
/// supplied it (after integer coercion).
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub dialect: Dialect,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub database: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("dialect", &self.dialect)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

/// Lifecycle of the server's single connection configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Nothing configured: initial state and the state after a disconnect
    /// or a failed connect.
    #[default]
    Unset,
    /// A configuration that passed a test connection.
    Active(ConnectionConfig),
}

impl ConnectionState {
    /// Whether a configuration is active.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// The active configuration, if any.
    pub fn config(&self) -> Option<&ConnectionConfig> {
        match self {
            Self::Active(config) => Some(config),
            Self::Unset => None,
        }
    }

    /// Replace whatever is configured with `config`.
    pub fn activate(&mut self, config: ConnectionConfig) {
        *self = Self::Active(config);
    }

    /// Clear the configuration, returning what was active.
    pub fn reset(&mut self) -> Option<ConnectionConfig> {
        match std::mem::take(self) {
            Self::Active(config) => Some(config),
            Self::Unset => None,
        }
    }
}
