//! Supported SQL dialects and their catalog conventions.
//!
//! Everything that differs between MySQL and PostgreSQL at the SQL-text level
//! is decided here by matching on [`Dialect`]; the connection manager never
//! compares dialect strings itself.

use crate::database::types::ResultSet;
use crate::error::ServerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog query listing the tables of the current MySQL database.
const MYSQL_LIST_TABLES: &str = "SHOW TABLES";

/// Catalog query listing the tables of the PostgreSQL `public` schema.
const POSTGRES_LIST_TABLES: &str =
    "SELECT table_name::text FROM information_schema.tables WHERE table_schema = 'public'";

/// Column listing for one PostgreSQL table; `$1` is the table name.
const POSTGRES_DESCRIBE_TABLE: &str = "SELECT column_name::text, data_type::text \
     FROM information_schema.columns WHERE table_name = $1 ORDER BY ordinal_position";

/// A database vendor's SQL flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL.
    PostgreSql,
}

/// A catalog statement plus the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl CatalogQuery {
    fn plain(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }
}

impl Dialect {
    /// Get the dialect name as reported to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
        }
    }

    /// Catalog query returning one table name per row in column 0.
    pub fn list_tables_query(&self) -> CatalogQuery {
        match self {
            Dialect::MySql => CatalogQuery::plain(MYSQL_LIST_TABLES),
            Dialect::PostgreSql => CatalogQuery::plain(POSTGRES_LIST_TABLES),
        }
    }

    /// Catalog query returning `(column_name, data_type)` rows for `table`.
    ///
    /// PostgreSQL binds the table name as a parameter. MySQL's `DESCRIBE`
    /// cannot take a parameter, so the name is interpolated verbatim.
    pub fn describe_table_query(&self, table: &str) -> CatalogQuery {
        match self {
            Dialect::MySql => CatalogQuery::plain(format!("DESCRIBE {table}")),
            Dialect::PostgreSql => CatalogQuery {
                sql: POSTGRES_DESCRIBE_TABLE.to_string(),
                params: vec![table.to_string()],
            },
        }
    }

    /// Query feeding one table's block of the schema dump.
    ///
    /// MySQL returns `(Table, Create Table)`; PostgreSQL reuses the column
    /// listing because it has no single "show create table" statement.
    pub fn table_definition_query(&self, table: &str) -> CatalogQuery {
        match self {
            Dialect::MySql => CatalogQuery::plain(format!("SHOW CREATE TABLE {table}")),
            Dialect::PostgreSql => self.describe_table_query(table),
        }
    }

    /// Turn the result of [`Dialect::table_definition_query`] into a dump block.
    pub fn render_table_definition(&self, table: &str, result: &ResultSet) -> String {
        match self {
            Dialect::MySql => result.column_text(1).join("\n"),
            Dialect::PostgreSql => {
                let columns = render_columns(&column_pairs(result));
                if columns.is_empty() {
                    format!("Table: {table}")
                } else {
                    format!("Table: {table}\n{columns}")
                }
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgresql" | "postgres" => Ok(Dialect::PostgreSql),
            _ => Err(ServerError::UnsupportedDialect(s.to_string())),
        }
    }
}

/// Pull `(column_name, data_type)` pairs out of a describe result.
///
/// Both `DESCRIBE` and the PostgreSQL column listing put the name in column 0
/// and the type in column 1.
pub fn column_pairs(result: &ResultSet) -> Vec<(String, String)> {
    result
        .rows
        .iter()
        .filter_map(|row| match (row.first(), row.get(1)) {
            (Some(name), Some(data_type)) => {
                Some((name.to_display_string(), data_type.to_display_string()))
            }
            _ => None,
        })
        .collect()
}

/// Render column pairs as `name: type` lines.
pub fn render_columns(columns: &[(String, String)]) -> String {
    columns
        .iter()
        .map(|(name, data_type)| format!("{name}: {data_type}"))
        .collect::<Vec<_>>()
        .join("\n")
}
