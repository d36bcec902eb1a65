//! Database connectivity and statement execution.

mod connection;
pub mod dialect;
mod driver;
mod mysql;
mod postgres;
pub mod statements;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use connection::{ConnectRequest, ConnectSummary, ConnectionManager};
pub use dialect::Dialect;
pub use driver::{ConnectionHandle, Driver, SqlxDriver};
pub(crate) use driver::truncate_for_log;
pub use types::{ResultSet, SqlValue, StatementOutcome};

/// Classify what a statement produced.
///
/// Any streamed row means a result set. With no rows, the leading keyword
/// decides between an empty result set and a row-count outcome.
pub(crate) fn outcome_from(
    sql: &str,
    rows: Vec<Vec<SqlValue>>,
    rows_affected: u64,
) -> StatementOutcome {
    if !rows.is_empty() || driver::has_result_shape(sql) {
        StatementOutcome::Rows(ResultSet { rows })
    } else {
        StatementOutcome::Executed { rows_affected }
    }
}
