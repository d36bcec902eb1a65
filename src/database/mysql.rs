//! MySQL adapter.

use super::driver::{parse_port, truncate_for_log, ConnectionHandle};
use super::outcome_from;
use super::types::{SqlValue, StatementOutcome};
use crate::constants::LOG_SQL_MAX_LEN;
use crate::error::ServerError;
use crate::state::ConnectionConfig;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures_util::stream::TryStreamExt;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Either, Executor, Row, TypeInfo};
use tracing::debug;

/// A single MySQL connection.
pub struct MySqlHandle {
    conn: MySqlConnection,
}

impl MySqlHandle {
    /// Connect using the stored configuration.
    pub async fn open(config: &ConnectionConfig) -> Result<Self, ServerError> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(parse_port(&config.port)?)
            .username(&config.user)
            .password(&config.password);
        if !config.database.trim().is_empty() {
            options = options.database(config.database.trim());
        }

        debug!("Opening MySQL connection to {}:{}", config.host, config.port);
        let conn = MySqlConnection::connect_with(&options).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl ConnectionHandle for MySqlHandle {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[String],
    ) -> Result<StatementOutcome, ServerError> {
        debug!("MySQL execute: {}", truncate_for_log(sql, LOG_SQL_MAX_LEN));

        let mut rows: Vec<Vec<SqlValue>> = Vec::new();
        let mut rows_affected: u64 = 0;

        if params.is_empty() {
            // Text protocol: accepts SHOW/DESCRIBE/DDL that cannot be prepared.
            let mut stream = (&mut self.conn).fetch_many(sqlx::raw_sql(sql));
            while let Some(item) = stream.try_next().await? {
                match item {
                    Either::Left(done) => rows_affected += done.rows_affected(),
                    Either::Right(row) => rows.push(convert_row(&row)),
                }
            }
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = query.bind(param.as_str());
            }
            let fetched = query.fetch_all(&mut self.conn).await?;
            rows = fetched.iter().map(convert_row).collect();
        }

        Ok(outcome_from(sql, rows, rows_affected))
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.conn.close().await {
            debug!("MySQL connection did not close cleanly: {}", e);
        }
    }
}

fn convert_row(row: &MySqlRow) -> Vec<SqlValue> {
    (0..row.columns().len())
        .map(|idx| extract_value(row, idx))
        .collect()
}

/// Decode column `idx` into the closest [`SqlValue`].
fn extract_value(row: &MySqlRow, idx: usize) -> SqlValue {
    // Try u64 first for BIGINT UNSIGNED columns
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(SqlValue::U64).unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(SqlValue::I64).unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(SqlValue::F64).unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
        return v
            .map(|f| SqlValue::F64(f64::from(f)))
            .unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<Decimal>, _>(idx) {
        return v.map(SqlValue::Decimal).unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return v.map(SqlValue::Bool).unwrap_or(SqlValue::Null);
    }
    // DATETIME carries no zone; only TIMESTAMP is stored as UTC.
    if is_timestamp(row, idx) {
        if let Ok(v) = row.try_get::<Option<DateTime<Utc>>, _>(idx) {
            return v.map(SqlValue::DateTimeUtc).unwrap_or(SqlValue::Null);
        }
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(idx) {
        return v.map(SqlValue::DateTime).unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<NaiveDate>, _>(idx) {
        return v.map(SqlValue::Date).unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<NaiveTime>, _>(idx) {
        return v.map(SqlValue::Time).unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<serde_json::Value>, _>(idx) {
        return v.map(SqlValue::Json).unwrap_or(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(SqlValue::String).unwrap_or(SqlValue::Null);
    }
    // Information schema columns often come back with a binary collation.
    if let Ok(v) = row.try_get_unchecked::<Option<Vec<u8>>, _>(idx) {
        return v
            .map(|bytes| match String::from_utf8(bytes) {
                Ok(s) => SqlValue::String(s),
                Err(e) => SqlValue::Bytes(e.into_bytes()),
            })
            .unwrap_or(SqlValue::Null);
    }

    SqlValue::String(format!("<{}>", type_name(row, idx)))
}

fn type_name(row: &MySqlRow, idx: usize) -> String {
    row.columns()
        .get(idx)
        .map(|c| c.type_info().name().to_string())
        .unwrap_or_default()
}

fn is_timestamp(row: &MySqlRow, idx: usize) -> bool {
    is_zoned_type(&type_name(row, idx))
}

fn is_zoned_type(type_name: &str) -> bool {
    type_name.eq_ignore_ascii_case("TIMESTAMP")
}
