//! Connection lifecycle and dialect dispatch.
//!
//! [`ConnectionManager`] owns the server's connection state, opens a fresh
//! connection for every operation, picks the statement text for the active
//! dialect and always closes the connection before returning.

use super::dialect::{column_pairs, CatalogQuery};
use super::driver::{ConnectionHandle, Driver};
use super::types::{ResultSet, StatementOutcome};
use super::{statements, Dialect};
use crate::constants::SCHEMA_BLOCK_SEPARATOR;
use crate::error::ServerError;
use crate::state::{ConnectionConfig, SharedState};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Raw arguments of a connect request, before validation.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub dialect: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub database: String,
}

/// What a successful connect reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectSummary {
    pub dialect: Dialect,
    pub database: String,
    pub tables: Vec<String>,
}

/// Holds the single connection configuration and runs every operation
/// against it.
pub struct ConnectionManager {
    state: SharedState,
    driver: Arc<dyn Driver>,
    connect_timeout: Duration,
    /// Serializes connect/disconnect so their all-or-nothing updates never
    /// interleave.
    lifecycle: Mutex<()>,
}

impl ConnectionManager {
    /// Create a manager over `state` that opens connections through `driver`.
    pub fn new(state: SharedState, driver: Arc<dyn Driver>, connect_timeout: Duration) -> Self {
        Self {
            state,
            driver,
            connect_timeout,
            lifecycle: Mutex::new(()),
        }
    }

    /// The shared connection state.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Dialect of the active configuration, if any.
    pub fn active_dialect(&self) -> Option<Dialect> {
        self.state.read().config().map(|c| c.dialect)
    }

    /// Database name of the active configuration, if any.
    pub fn active_database(&self) -> Option<String> {
        self.state.read().config().map(|c| c.database.clone())
    }

    /// Test a configuration and make it the active one.
    ///
    /// The new configuration is stored only after a connection was opened and
    /// the table listing succeeded. Any failure leaves the state `Unset`, even
    /// if another configuration was active before.
    pub async fn connect(&self, request: ConnectRequest) -> Result<ConnectSummary, ServerError> {
        let _lifecycle = self.lifecycle.lock().await;

        match self.probe(request).await {
            Ok((config, summary)) => {
                info!(
                    "Connected to {} database '{}' at {}:{} ({} tables)",
                    config.dialect,
                    config.database,
                    config.host,
                    config.port,
                    summary.tables.len()
                );
                self.state.write().activate(config);
                Ok(summary)
            }
            Err(e) => {
                warn!("Connect failed: {}", e);
                self.state.write().reset();
                Err(e)
            }
        }
    }

    async fn probe(
        &self,
        request: ConnectRequest,
    ) -> Result<(ConnectionConfig, ConnectSummary), ServerError> {
        let dialect: Dialect = request.dialect.parse()?;
        let config = ConnectionConfig {
            dialect,
            user: request.user,
            password: request.password,
            host: request.host,
            port: request.port,
            database: request.database,
        };

        let tables = self
            .run_scoped(&config, |conn, dialect| {
                async move { list_tables_on(conn, dialect).await }.boxed()
            })
            .await?;

        let summary = ConnectSummary {
            dialect,
            database: config.database.clone(),
            tables,
        };
        Ok((config, summary))
    }

    /// Forget the active configuration.
    ///
    /// Returns `false` if nothing was connected. No connection is opened.
    pub async fn disconnect(&self) -> bool {
        let _lifecycle = self.lifecycle.lock().await;
        match self.state.write().reset() {
            Some(config) => {
                info!("Disconnected from {} database '{}'", config.dialect, config.database);
                true
            }
            None => false,
        }
    }

    /// Run an arbitrary statement.
    pub async fn run_statement(&self, sql: &str) -> Result<StatementOutcome, ServerError> {
        let sql = sql.to_string();
        self.with_connection(move |conn, _| async move { conn.execute(&sql, &[]).await }.boxed())
            .await
    }

    /// Names of the tables visible to the active configuration, in catalog order.
    pub async fn list_tables(&self) -> Result<Vec<String>, ServerError> {
        self.with_connection(|conn, dialect| {
            async move { list_tables_on(conn, dialect).await }.boxed()
        })
        .await
    }

    /// `(column_name, data_type)` pairs of `table`.
    pub async fn describe_table(&self, table: &str) -> Result<Vec<(String, String)>, ServerError> {
        let table = table.to_string();
        self.with_connection(move |conn, dialect| {
            async move {
                let result = run_catalog(conn, &dialect.describe_table_query(&table)).await?;
                Ok(column_pairs(&result))
            }
            .boxed()
        })
        .await
    }

    /// Definition of every table, one block per table, blank-line separated.
    pub async fn dump_schema(&self) -> Result<String, ServerError> {
        self.with_connection(|conn, dialect| {
            async move {
                let tables = list_tables_on(&mut *conn, dialect).await?;
                let mut blocks = Vec::with_capacity(tables.len());
                for table in &tables {
                    let result =
                        run_catalog(&mut *conn, &dialect.table_definition_query(table)).await?;
                    blocks.push(dialect.render_table_definition(table, &result));
                }
                Ok(blocks.join(SCHEMA_BLOCK_SEPARATOR))
            }
            .boxed()
        })
        .await
    }

    /// `CREATE TABLE <name> (<column_defs>)`
    pub async fn create_table(&self, name: &str, column_defs: &str) -> Result<(), ServerError> {
        self.execute_ddl(statements::create_table(name, column_defs)).await
    }

    /// `ALTER TABLE <table> ADD COLUMN <column_def>`
    pub async fn add_column(&self, table: &str, column_def: &str) -> Result<(), ServerError> {
        self.execute_ddl(statements::add_column(table, column_def)).await
    }

    /// `ALTER TABLE <table> ADD FOREIGN KEY (<column>) REFERENCES <ref_table>(<ref_column>)`
    pub async fn add_foreign_key(
        &self,
        table: &str,
        column: &str,
        ref_table: &str,
        ref_column: &str,
    ) -> Result<(), ServerError> {
        self.execute_ddl(statements::add_foreign_key(
            table, column, ref_table, ref_column,
        ))
        .await
    }

    /// `DROP TABLE IF EXISTS <name>`
    pub async fn drop_table(&self, name: &str) -> Result<(), ServerError> {
        self.execute_ddl(statements::drop_table(name)).await
    }

    /// Rows of `EXPLAIN <sql>`.
    pub async fn explain(&self, sql: &str) -> Result<ResultSet, ServerError> {
        let outcome = self.run_statement(&statements::explain(sql)).await?;
        Ok(outcome.into_rows())
    }

    async fn execute_ddl(&self, sql: String) -> Result<(), ServerError> {
        self.with_connection(move |conn, _| {
            async move {
                conn.execute(&sql, &[]).await?;
                Ok(())
            }
            .boxed()
        })
        .await
    }

    /// Run `f` on a fresh connection for the active configuration.
    ///
    /// Fails with [`ServerError::NotConnected`] before touching the driver
    /// when no configuration is active.
    async fn with_connection<T, F>(&self, f: F) -> Result<T, ServerError>
    where
        T: Send,
        F: for<'c> FnOnce(
                &'c mut dyn ConnectionHandle,
                Dialect,
            ) -> BoxFuture<'c, Result<T, ServerError>>
            + Send,
    {
        let config = self
            .state
            .read()
            .config()
            .cloned()
            .ok_or(ServerError::NotConnected)?;
        self.run_scoped(&config, f).await
    }

    /// Open a connection for `config`, run `f`, and close the connection on
    /// every path out of `f`.
    async fn run_scoped<T, F>(&self, config: &ConnectionConfig, f: F) -> Result<T, ServerError>
    where
        T: Send,
        F: for<'c> FnOnce(
                &'c mut dyn ConnectionHandle,
                Dialect,
            ) -> BoxFuture<'c, Result<T, ServerError>>
            + Send,
    {
        let mut handle = self.open(config).await?;
        let result = f(handle.as_mut(), config.dialect).await;
        handle.close().await;
        debug!("Connection to {}:{} closed", config.host, config.port);
        result
    }

    async fn open(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn ConnectionHandle>, ServerError> {
        match tokio::time::timeout(self.connect_timeout, self.driver.open(config)).await {
            Ok(result) => result,
            Err(_) => Err(ServerError::timeout(self.connect_timeout.as_secs())),
        }
    }
}

async fn run_catalog(
    conn: &mut dyn ConnectionHandle,
    query: &CatalogQuery,
) -> Result<ResultSet, ServerError> {
    Ok(conn.execute(&query.sql, &query.params).await?.into_rows())
}

async fn list_tables_on(
    conn: &mut dyn ConnectionHandle,
    dialect: Dialect,
) -> Result<Vec<String>, ServerError> {
    let result = run_catalog(conn, &dialect.list_tables_query()).await?;
    Ok(result.column_text(0))
}
