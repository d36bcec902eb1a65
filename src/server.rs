//! MCP server struct definition and initialization.

use crate::config::Config;
use crate::database::{ConnectionManager, Dialect, Driver, SqlxDriver};
use crate::error::ServerError;
use crate::state::new_shared_state;
use rmcp::handler::server::router::tool::ToolRouter;
use std::fmt;
use std::sync::Arc;

/// The SQL Advisor MCP Server instance.
///
/// This struct is cloned for each request, but the connection state is
/// shared via Arc. The server provides:
///
/// - **Tools**: Connection management, statement execution, schema changes
///   and static query advice
/// - **Resources**: A text dump of the connected database's schema
pub struct SqlAdvisorServer {
    /// Connection state and per-operation connection handling.
    pub(crate) manager: Arc<ConnectionManager>,

    /// Configuration.
    pub(crate) config: Arc<Config>,

    /// Tool router for dispatching tool calls.
    pub(crate) tool_router: ToolRouter<Self>,
}

impl Clone for SqlAdvisorServer {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            config: Arc::clone(&self.config),
            tool_router: crate::tools::create_tool_router(),
        }
    }
}

impl fmt::Debug for SqlAdvisorServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlAdvisorServer")
            .field("config", &self.config)
            .field("connected", &self.active_dialect())
            .field("tool_router", &"<ToolRouter>")
            .finish()
    }
}

impl SqlAdvisorServer {
    /// Create a server backed by the sqlx MySQL and PostgreSQL drivers.
    ///
    /// No database is contacted until a client calls `connect_to_database`.
    pub fn new(config: Config) -> Self {
        let driver = Arc::new(SqlxDriver::new(config.application_name.clone()));
        Self::with_driver(config, driver)
    }

    /// Create a server that opens connections through `driver`.
    pub fn with_driver(config: Config, driver: Arc<dyn Driver>) -> Self {
        let manager = ConnectionManager::new(new_shared_state(), driver, config.connect_timeout);

        Self {
            manager: Arc::new(manager),
            config: Arc::new(config),
            tool_router: crate::tools::create_tool_router(),
        }
    }

    /// Create a server from environment variables.
    ///
    /// This is the standard way to create a server for production use.
    pub fn from_env() -> Result<Self, ServerError> {
        let config = Config::from_env()?;
        Ok(Self::new(config))
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the connection manager.
    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Dialect of the active connection, if any.
    pub fn active_dialect(&self) -> Option<Dialect> {
        self.manager.active_dialect()
    }

    /// Database name of the active connection, if any.
    pub fn current_database(&self) -> Option<String> {
        self.manager.active_database()
    }
}
