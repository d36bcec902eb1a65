//! In-memory driver for exercising the connection manager without a database.

use super::driver::{has_result_shape, ConnectionHandle, Driver};
use super::types::{ResultSet, SqlValue, StatementOutcome};
use super::ConnectionManager;
use crate::error::ServerError;
use crate::state::{new_shared_state, ConnectionConfig};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Records every driver interaction.
#[derive(Default)]
pub(crate) struct Recorder {
    opens: AtomicUsize,
    closes: AtomicUsize,
    statements: Mutex<Vec<(String, Vec<String>)>>,
}

impl Recorder {
    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.statements.lock().iter().map(|(s, _)| s.clone()).collect()
    }

    pub(crate) fn last_statement(&self) -> Option<(String, Vec<String>)> {
        self.statements.lock().last().cloned()
    }
}

#[derive(Clone, Default)]
pub(crate) struct Behaviour {
    pub(crate) tables: Vec<String>,
    pub(crate) reject_open: bool,
    pub(crate) open_delay: Option<Duration>,
    pub(crate) failing_sql: Option<String>,
}

struct FakeDriver {
    recorder: Arc<Recorder>,
    behaviour: Behaviour,
}

struct FakeHandle {
    recorder: Arc<Recorder>,
    behaviour: Behaviour,
}

fn text_rows(rows: &[&[&str]]) -> StatementOutcome {
    StatementOutcome::Rows(ResultSet {
        rows: rows
            .iter()
            .map(|r| r.iter().map(|v| SqlValue::String(v.to_string())).collect())
            .collect(),
    })
}

#[async_trait]
impl Driver for FakeDriver {
    async fn open(
        &self,
        _config: &ConnectionConfig,
    ) -> Result<Box<dyn ConnectionHandle>, ServerError> {
        if let Some(delay) = self.behaviour.open_delay {
            tokio::time::sleep(delay).await;
        }
        if self.behaviour.reject_open {
            return Err(ServerError::auth("Access denied for user 'app'"));
        }
        self.recorder.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeHandle {
            recorder: Arc::clone(&self.recorder),
            behaviour: self.behaviour.clone(),
        }))
    }
}

#[async_trait]
impl ConnectionHandle for FakeHandle {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[String],
    ) -> Result<StatementOutcome, ServerError> {
        self.recorder
            .statements
            .lock()
            .push((sql.to_string(), params.to_vec()));

        if self.behaviour.failing_sql.as_deref() == Some(sql) {
            return Err(ServerError::query_error("relation does not exist"));
        }

        let tables: Vec<&str> = self.behaviour.tables.iter().map(String::as_str).collect();
        if sql == "SHOW TABLES" || sql.contains("information_schema.tables") {
            let rows: Vec<&[&str]> = tables.iter().map(std::slice::from_ref).collect();
            return Ok(text_rows(&rows));
        }
        if sql.starts_with("DESCRIBE ") || sql.contains("information_schema.columns") {
            return Ok(text_rows(&[&["id", "integer"], &["name", "text"]]));
        }
        if let Some(table) = sql.strip_prefix("SHOW CREATE TABLE ") {
            let ddl = format!("CREATE TABLE `{table}` (`id` int)");
            return Ok(text_rows(&[&[table, &ddl]]));
        }
        if has_result_shape(sql) {
            return Ok(StatementOutcome::Rows(ResultSet {
                rows: vec![
                    vec![SqlValue::I64(2), SqlValue::String("Bob".into())],
                    vec![SqlValue::I64(1), SqlValue::String("Alice".into())],
                ],
            }));
        }
        Ok(StatementOutcome::Executed { rows_affected: 1 })
    }

    async fn close(self: Box<Self>) {
        self.recorder.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A fake driver and the recorder observing it.
pub(crate) fn fake_driver(behaviour: Behaviour) -> (Arc<dyn Driver>, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let driver = FakeDriver {
        recorder: Arc::clone(&recorder),
        behaviour,
    };
    (Arc::new(driver), recorder)
}

pub(crate) fn manager_with(behaviour: Behaviour) -> (ConnectionManager, Arc<Recorder>) {
    let (driver, recorder) = fake_driver(behaviour);
    let manager = ConnectionManager::new(new_shared_state(), driver, Duration::from_millis(200));
    (manager, recorder)
}

pub(crate) fn with_tables(tables: &[&str]) -> Behaviour {
    Behaviour {
        tables: tables.iter().map(|t| t.to_string()).collect(),
        ..Behaviour::default()
    }
}
