//! Driver-neutral value and result types.
//!
//! Both dialect adapters decode their rows into [`SqlValue`]s so the rest of
//! the server renders results without knowing which database produced them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// A SQL value decoded from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Decimal(Decimal),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeUtc(DateTime<Utc>),
    Json(serde_json::Value),
}

impl SqlValue {
    /// Convert to a display string.
    pub fn to_display_string(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(v) => v.to_string(),
            SqlValue::I64(v) => v.to_string(),
            SqlValue::U64(v) => v.to_string(),
            SqlValue::F64(v) => v.to_string(),
            SqlValue::String(v) => v.clone(),
            SqlValue::Bytes(v) => format!("0x{}", hex::encode(v)),
            SqlValue::Decimal(v) => v.to_string(),
            SqlValue::Uuid(v) => v.to_string(),
            SqlValue::Date(v) => v.to_string(),
            SqlValue::Time(v) => v.to_string(),
            SqlValue::DateTime(v) => v.to_string(),
            SqlValue::DateTimeUtc(v) => v.to_rfc3339(),
            SqlValue::Json(v) => v.to_string(),
        }
    }

    /// Render as an element of a row tuple: text-like values are quoted.
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null
            | SqlValue::Bool(_)
            | SqlValue::I64(_)
            | SqlValue::U64(_)
            | SqlValue::F64(_)
            | SqlValue::Bytes(_)
            | SqlValue::Decimal(_) => self.to_display_string(),
            _ => quote(&self.to_display_string()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Rows returned by a statement with a result shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Rows in the order the database returned them.
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    /// Render every row as a tuple, one per line.
    pub fn render_rows(&self) -> String {
        self.rows
            .iter()
            .map(|row| render_tuple(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The display text of column `idx` for every row.
    ///
    /// Rows shorter than `idx + 1` are skipped.
    pub fn column_text(&self, idx: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(idx).map(SqlValue::to_display_string))
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were returned.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render a row as `(v1, v2, ...)`.
///
/// A one-value row keeps a trailing comma, `('users',)`, so it still reads as
/// a tuple.
pub fn render_tuple(row: &[SqlValue]) -> String {
    let values: Vec<String> = row.iter().map(SqlValue::to_literal).collect();
    match values.as_slice() {
        [single] => format!("({single},)"),
        _ => format!("({})", values.join(", ")),
    }
}

/// What a single statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// The statement had a result shape (possibly with zero rows).
    Rows(ResultSet),
    /// The statement had no result shape.
    Executed { rows_affected: u64 },
}

impl StatementOutcome {
    /// The rows, or an empty set for statements without a result shape.
    pub fn into_rows(self) -> ResultSet {
        match self {
            StatementOutcome::Rows(rows) => rows,
            StatementOutcome::Executed { .. } => ResultSet::default(),
        }
    }
}
