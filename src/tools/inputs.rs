//! Tool input types with JSON Schema generation.

use crate::database::ConnectRequest;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value clients may send either as a JSON string or as an integer.
///
/// Ports and numeric passwords are commonly sent unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StringOrInteger {
    Integer(i64),
    String(String),
}

impl fmt::Display for StringOrInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringOrInteger::Integer(i) => write!(f, "{i}"),
            StringOrInteger::String(s) => f.write_str(s),
        }
    }
}

impl From<StringOrInteger> for String {
    fn from(value: StringOrInteger) -> Self {
        match value {
            StringOrInteger::String(s) => s,
            other => other.to_string(),
        }
    }
}

/// Input for the `connect_to_database` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConnectInput {
    /// Database type: 'mysql' or 'postgresql'.
    #[serde(rename = "type")]
    pub db_type: String,

    /// Database username.
    pub user: String,

    /// Database password (string or integer).
    pub password: StringOrInteger,

    /// Database host (e.g. 'localhost').
    pub host: String,

    /// Database port (e.g. 3306 for MySQL, 5432 for PostgreSQL), as string or integer.
    pub port: StringOrInteger,

    /// Database name.
    pub database: String,
}

impl From<ConnectInput> for ConnectRequest {
    fn from(input: ConnectInput) -> Self {
        ConnectRequest {
            dialect: input.db_type,
            user: input.user,
            password: input.password.into(),
            host: input.host,
            port: input.port.into(),
            database: input.database,
        }
    }
}

/// Input for tools that take a single SQL statement.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// The SQL statement.
    pub query: String,
}

/// Input for the `create_table` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateTableInput {
    /// Name of the table to create.
    pub table_name: String,

    /// Column definitions, e.g. "id INT PRIMARY KEY, name VARCHAR(100)".
    pub columns: String,
}

/// Input for the `add_column` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddColumnInput {
    /// Table to alter.
    pub table_name: String,

    /// Column definition, e.g. "email VARCHAR(255) NOT NULL".
    pub column_def: String,
}

/// Input for the `add_foreign_key` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddForeignKeyInput {
    /// Table that receives the constraint.
    pub table: String,

    /// Referencing column.
    pub column: String,

    /// Referenced table.
    pub ref_table: String,

    /// Referenced column.
    pub ref_column: String,
}

/// Input for tools that take a single table name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableNameInput {
    /// Table name.
    pub table_name: String,
}
