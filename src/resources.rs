//! MCP Resources for database schema information.
//!
//! Resources provide passive read-only access to the connected database.
//!
//! - `schema://main` - Definition of every table, blank-line separated
//!   (`SHOW CREATE TABLE` output on MySQL, `Table: name` column listings on
//!   PostgreSQL)

use crate::constants::{ERROR_PREFIX, SCHEMA_RESOURCE_URI};
use crate::server::SqlAdvisorServer;
use rmcp::model::{
    AnnotateAble, ListResourcesResult, RawResource, ReadResourceResult, Resource, ResourceContents,
};
use rmcp::ErrorData;
use tracing::{debug, warn};

/// Build the list of available resources.
pub fn build_resource_list() -> Vec<Resource> {
    vec![create_resource(
        SCHEMA_RESOURCE_URI,
        "Database Schema",
        "Table definitions of the connected database",
        "text/plain",
    )]
}

/// The complete resource listing; there is a single page.
pub fn resource_listing() -> ListResourcesResult {
    ListResourcesResult {
        resources: build_resource_list(),
        next_cursor: None,
    }
}

/// Read the resource at `uri`.
///
/// Only an unknown URI is a protocol error. Failures while dumping the schema
/// are returned as the resource text, prefixed with `Error: `.
pub async fn read_resource(
    server: &SqlAdvisorServer,
    uri: &str,
) -> Result<ReadResourceResult, ErrorData> {
    if uri != SCHEMA_RESOURCE_URI {
        return Err(ErrorData::resource_not_found(
            format!("Unknown resource: {uri}"),
            None,
        ));
    }

    debug!("Reading schema resource");
    let text = match server.manager().dump_schema().await {
        Ok(schema) => schema,
        Err(e) => {
            warn!("Schema dump failed: {}", e);
            format!("{ERROR_PREFIX}{e}")
        }
    };

    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(text, uri.to_string())],
    })
}

fn create_resource(uri: &str, name: &str, description: &str, mime_type: &str) -> Resource {
    let mut resource = RawResource::new(uri, name);
    resource.description = Some(description.to_string());
    resource.mime_type = Some(mime_type.to_string());
    resource.no_annotation()
}
