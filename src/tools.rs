//! MCP Tools for MySQL and PostgreSQL operations.
//!
//! - `connect_to_database`: Test credentials and make them the active connection
//! - `disconnect_database`: Forget the active connection
//! - `run_query`: Execute an arbitrary SQL statement
//! - `suggest_optimization`: Static advice on a statement (no connection needed)
//! - `explain_query`: Show the execution plan of a statement
//! - `create_table`, `add_column`, `add_foreign_key`, `drop_table`: Schema changes
//! - `list_tables`: List the tables of the connected database
//! - `describe_table`: List the columns of a table
//!
//! Connect and disconnect answer with a JSON document. Every other tool answers
//! with plain text; failures come back as error results prefixed with `Error: `.

mod inputs;
mod outputs;

pub use inputs::*;
pub use outputs::*;

use crate::advisor;
use crate::constants::{ERROR_PREFIX, LOG_SQL_MAX_LEN, MSG_QUERY_EXECUTED};
use crate::database::dialect::render_columns;
use crate::database::StatementOutcome;
use crate::error::{ErrorKind, ServerError};
use crate::server::SqlAdvisorServer;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content};
use rmcp::{tool, tool_router, ErrorData};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Build the router for every tool below.
pub(crate) fn create_tool_router() -> ToolRouter<SqlAdvisorServer> {
    SqlAdvisorServer::tool_router()
}

#[tool_router]
impl SqlAdvisorServer {
    // =========================================================================
    // Connection Tools
    // =========================================================================

    /// Test the supplied credentials and store them for later calls.
    #[tool(
        description = "Connect to a MySQL or PostgreSQL database. Returns JSON with the connection status, database type and available tables."
    )]
    pub async fn connect_to_database(
        &self,
        Parameters(input): Parameters<ConnectInput>,
    ) -> Result<CallToolResult, ErrorData> {
        info!(
            "Connecting to {} database '{}' at {}:{}",
            input.db_type, input.database, input.host, input.port
        );

        let result = match self.manager.connect(input.into()).await {
            Ok(summary) => ConnectResult::from(summary),
            Err(e) => ConnectResult::Error {
                message: e.to_string(),
            },
        };

        json_result(&result)
    }

    #[tool(description = "Disconnect from the current database connection.")]
    pub async fn disconnect_database(&self) -> Result<CallToolResult, ErrorData> {
        let was_connected = self.manager.disconnect().await;
        json_result(&DisconnectResult::from_outcome(was_connected))
    }

    // =========================================================================
    // Query Tools
    // =========================================================================

    /// Execute a statement and render its rows, if any.
    #[tool(
        description = "Execute a SQL statement. Returns one line per row for statements that produce rows, otherwise a confirmation."
    )]
    pub async fn run_query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!("run_query: {}", truncate(&input.query));

        match self.manager.run_statement(&input.query).await {
            Ok(StatementOutcome::Rows(rows)) => Ok(text_result(rows.render_rows())),
            Ok(StatementOutcome::Executed { rows_affected }) => {
                debug!("Statement affected {} rows", rows_affected);
                Ok(text_result(MSG_QUERY_EXECUTED))
            }
            Err(e) => Ok(error_result("run_query", e)),
        }
    }

    #[tool(
        description = "Suggest optimizations for a SQL query using static rules. Does not need a database connection."
    )]
    pub async fn suggest_optimization(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(text_result(advisor::suggest_optimization(&input.query)))
    }

    #[tool(description = "Get the execution plan for a SQL query. Useful for query optimization.")]
    pub async fn explain_query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!("explain_query: {}", truncate(&input.query));

        match self.manager.explain(&input.query).await {
            Ok(plan) => Ok(text_result(plan.render_rows())),
            Err(e) => Ok(error_result("explain_query", e)),
        }
    }

    // =========================================================================
    // Schema Change Tools
    // =========================================================================
    //
    // Table names and definitions are inserted into the statement text as
    // given. They are trusted SQL fragments, not bound parameters.

    #[tool(description = "Create a table. 'columns' is the column definition list, e.g. 'id INT PRIMARY KEY, name VARCHAR(100)'.")]
    pub async fn create_table(
        &self,
        Parameters(input): Parameters<CreateTableInput>,
    ) -> Result<CallToolResult, ErrorData> {
        match self
            .manager
            .create_table(&input.table_name, &input.columns)
            .await
        {
            Ok(()) => {
                info!("Created table '{}'", input.table_name);
                Ok(text_result(format!(
                    "Table '{}' created successfully",
                    input.table_name
                )))
            }
            Err(e) => Ok(error_result("create_table", e)),
        }
    }

    #[tool(description = "Add a column to an existing table. 'column_def' is a full column definition, e.g. 'email VARCHAR(255)'.")]
    pub async fn add_column(
        &self,
        Parameters(input): Parameters<AddColumnInput>,
    ) -> Result<CallToolResult, ErrorData> {
        match self
            .manager
            .add_column(&input.table_name, &input.column_def)
            .await
        {
            Ok(()) => Ok(text_result(format!(
                "Column added to '{}' successfully",
                input.table_name
            ))),
            Err(e) => Ok(error_result("add_column", e)),
        }
    }

    #[tool(description = "Add a foreign key from table.column to ref_table.ref_column.")]
    pub async fn add_foreign_key(
        &self,
        Parameters(input): Parameters<AddForeignKeyInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let AddForeignKeyInput {
            table,
            column,
            ref_table,
            ref_column,
        } = input;

        match self
            .manager
            .add_foreign_key(&table, &column, &ref_table, &ref_column)
            .await
        {
            Ok(()) => Ok(text_result(format!(
                "Foreign key added to '{table}.{column}' referencing '{ref_table}.{ref_column}'"
            ))),
            Err(e) => Ok(error_result("add_foreign_key", e)),
        }
    }

    #[tool(description = "Drop a table if it exists. Dropping a missing table is not an error.")]
    pub async fn drop_table(
        &self,
        Parameters(input): Parameters<TableNameInput>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.manager.drop_table(&input.table_name).await {
            Ok(()) => {
                info!("Dropped table '{}'", input.table_name);
                Ok(text_result(format!(
                    "Table '{}' dropped successfully",
                    input.table_name
                )))
            }
            Err(e) => Ok(error_result("drop_table", e)),
        }
    }

    // =========================================================================
    // Metadata Tools
    // =========================================================================

    #[tool(description = "List the tables of the connected database, one per line.")]
    pub async fn list_tables(&self) -> Result<CallToolResult, ErrorData> {
        match self.manager.list_tables().await {
            Ok(tables) => Ok(text_result(tables.join("\n"))),
            Err(e) => Ok(error_result("list_tables", e)),
        }
    }

    #[tool(description = "Describe the columns of a table as 'name: type' lines.")]
    pub async fn describe_table(
        &self,
        Parameters(input): Parameters<TableNameInput>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.manager.describe_table(&input.table_name).await {
            Ok(columns) => Ok(text_result(render_columns(&columns))),
            Err(e) => Ok(error_result("describe_table", e)),
        }
    }
}

fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Render a failure as a tool-level error result.
fn error_result(tool: &str, error: ServerError) -> CallToolResult {
    match (error.kind(), error.suggestion()) {
        (ErrorKind::NotConnected, _) => debug!("{} called without an active connection", tool),
        (_, Some(hint)) => warn!("{} failed: {} ({})", tool, error, hint),
        (_, None) => warn!("{} failed: {}", tool, error),
    }
    CallToolResult::error(vec![Content::text(format!("{ERROR_PREFIX}{error}"))])
}

fn json_result<T: Serialize>(payload: &T) -> Result<CallToolResult, ErrorData> {
    let text = serde_json::to_string(payload)
        .map_err(|e| ErrorData::internal_error(format!("Failed to serialize result: {e}"), None))?;
    Ok(text_result(text))
}

fn truncate(sql: &str) -> String {
    crate::database::truncate_for_log(sql, LOG_SQL_MAX_LEN)
}
