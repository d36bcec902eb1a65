//! ServerHandler implementation for the SQL Advisor MCP Server.
//!
//! This module implements the rmcp `ServerHandler` trait which defines how
//! the server responds to MCP protocol requests.

use crate::resources::{read_resource, resource_listing};
use crate::server::SqlAdvisorServer;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    Implementation, ListResourcesResult, PaginatedRequestParam, ProtocolVersion,
    ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{tool_handler, ErrorData};
use tracing::info;

/// The `#[tool_handler]` macro wires up tool routing automatically.
/// It generates the `list_tools` and `call_tool` method implementations.
#[tool_handler]
impl ServerHandler for SqlAdvisorServer {
    /// Server identification - called during initialization handshake.
    fn get_info(&self) -> ServerInfo {
        info!("MCP client requesting server info");

        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,

            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),

            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some("DatabaseAdvisor".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },

            instructions: Some(build_instructions(self)),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(resource_listing())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        read_resource(self, &request.uri).await
    }
}

/// Build server instructions based on current state.
fn build_instructions(server: &SqlAdvisorServer) -> String {
    let mut instructions = String::new();

    instructions.push_str("# SQL Advisor MCP Server\n\n");
    instructions.push_str("This server inspects and modifies MySQL and PostgreSQL databases.\n\n");

    match (server.active_dialect(), server.current_database()) {
        (Some(dialect), Some(db)) => {
            instructions.push_str(&format!("**Connected to {dialect} database:** `{db}`\n\n"));
        }
        _ => {
            instructions.push_str("**Not connected.** Call `connect_to_database` first ");
            instructions.push_str("with type 'mysql' or 'postgresql'.\n\n");
        }
    }

    instructions.push_str("## Available Operations\n\n");
    instructions.push_str("### Tools\n");
    instructions.push_str("- `connect_to_database` / `disconnect_database`\n");
    instructions.push_str("- `run_query`, `explain_query`, `suggest_optimization`\n");
    instructions.push_str("- `list_tables`, `describe_table`\n");
    instructions.push_str(
        "- `create_table`, `add_column`, `add_foreign_key`, `drop_table` (arguments are inserted into the SQL text verbatim)\n\n",
    );
    instructions.push_str("### Resources\n");
    instructions.push_str("- `schema://main`: definition of every table\n");

    instructions
}
