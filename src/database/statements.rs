//! Statement synthesis for the DDL tools.
//!
//! Caller-supplied identifiers and fragments are trusted verbatim: nothing here
//! quotes, escapes or validates them. Callers that need stricter handling must
//! validate before reaching this module.

/// `CREATE TABLE <name> (<column_defs>)`
pub fn create_table(name: &str, column_defs: &str) -> String {
    format!("CREATE TABLE {name} ({column_defs})")
}

/// `ALTER TABLE <table> ADD COLUMN <column_def>`
pub fn add_column(table: &str, column_def: &str) -> String {
    format!("ALTER TABLE {table} ADD COLUMN {column_def}")
}

/// `ALTER TABLE <table> ADD FOREIGN KEY (<column>) REFERENCES <ref_table>(<ref_column>)`
pub fn add_foreign_key(table: &str, column: &str, ref_table: &str, ref_column: &str) -> String {
    format!("ALTER TABLE {table} ADD FOREIGN KEY ({column}) REFERENCES {ref_table}({ref_column})")
}

/// `DROP TABLE IF EXISTS <name>`
pub fn drop_table(name: &str) -> String {
    format!("DROP TABLE IF EXISTS {name}")
}

/// `EXPLAIN <sql>`
pub fn explain(sql: &str) -> String {
    format!("EXPLAIN {sql}")
}
