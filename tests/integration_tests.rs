//! Integration tests for the SQL Advisor MCP Server.
//!
//! These tests support two modes:
//! 1. **Testcontainers** (default): Automatically spins up MySQL and PostgreSQL containers
//! 2. **External server**: Connect to existing servers via `MYSQL_HOST` / `PG_HOST`
//!
//! ## Running with testcontainers (requires Docker):
//! ```bash
//! cargo test --test integration_tests -- --ignored --test-threads=1
//! ```
//!
//! ## Running against external servers (e.g., CI service containers):
//! ```bash
//! MYSQL_HOST=localhost MYSQL_PORT=3306 MYSQL_USER=root MYSQL_PASSWORD=root MYSQL_DATABASE=test \
//! PG_HOST=localhost PG_PORT=5432 PG_USER=postgres PG_PASSWORD=postgres PG_DATABASE=postgres \
//!   cargo test --test integration_tests -- --ignored --test-threads=1
//! ```

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serial_test::serial;
use sql_advisor_mcp_server::database::{ConnectRequest, Dialect, StatementOutcome};
use sql_advisor_mcp_server::tools::{QueryInput, TableNameInput};
use sql_advisor_mcp_server::{Config, SqlAdvisorServer};
use std::time::Duration;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mysql::Mysql;
use testcontainers_modules::postgres::Postgres;
use tokio_test::{assert_err, assert_ok};

/// Test database source.
#[allow(dead_code)] // Variants held for lifetime management (Drop trait)
enum TestDatabaseSource {
    /// External server configured via environment variables.
    External,
    MySqlContainer(Box<ContainerAsync<Mysql>>),
    PostgresContainer(Box<ContainerAsync<Postgres>>),
}

/// A reachable database plus the credentials to reach it.
struct TestDatabase {
    #[allow(dead_code)] // Held for lifetime management (Drop trait on Container)
    source: TestDatabaseSource,
    dialect: Dialect,
    host: String,
    port: u16,
    user: String,
    password: String,
    database: String,
}

impl TestDatabase {
    /// Uses an external server if `MYSQL_HOST` is set, otherwise testcontainers.
    async fn mysql() -> Self {
        match std::env::var("MYSQL_HOST") {
            Ok(host) => Self::from_external(Dialect::MySql, "MYSQL", host, 3306, "root", "test"),
            Err(_) => Self::mysql_container().await,
        }
    }

    /// Uses an external server if `PG_HOST` is set, otherwise testcontainers.
    async fn postgres() -> Self {
        match std::env::var("PG_HOST") {
            Ok(host) => {
                Self::from_external(Dialect::PostgreSql, "PG", host, 5432, "postgres", "postgres")
            }
            Err(_) => Self::postgres_container().await,
        }
    }

    async fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::MySql => Self::mysql().await,
            Dialect::PostgreSql => Self::postgres().await,
        }
    }

    fn from_external(
        dialect: Dialect,
        prefix: &str,
        host: String,
        default_port: u16,
        default_user: &str,
        default_database: &str,
    ) -> Self {
        let var = |name: &str| std::env::var(format!("{prefix}_{name}")).ok();
        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(default_port);

        eprintln!("Using external {} server at {}:{}", dialect, host, port);

        Self {
            source: TestDatabaseSource::External,
            dialect,
            host,
            port,
            user: var("USER").unwrap_or_else(|| default_user.to_string()),
            password: var("PASSWORD").unwrap_or_default(),
            database: var("DATABASE").unwrap_or_else(|| default_database.to_string()),
        }
    }

    async fn mysql_container() -> Self {
        eprintln!("Starting MySQL container via testcontainers...");
        let container = Mysql::default()
            .start()
            .await
            .unwrap_or_else(|e| panic!("Failed to start MySQL container: {}", e));
        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(3306)
            .await
            .expect("Failed to get port");

        Self {
            source: TestDatabaseSource::MySqlContainer(Box::new(container)),
            dialect: Dialect::MySql,
            host: host.to_string(),
            port,
            user: "root".to_string(),
            password: String::new(),
            database: "test".to_string(),
        }
    }

    async fn postgres_container() -> Self {
        eprintln!("Starting PostgreSQL container via testcontainers...");
        let container = Postgres::default()
            .start()
            .await
            .unwrap_or_else(|e| panic!("Failed to start PostgreSQL container: {}", e));
        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get port");

        Self {
            source: TestDatabaseSource::PostgresContainer(Box::new(container)),
            dialect: Dialect::PostgreSql,
            host: host.to_string(),
            port,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "postgres".to_string(),
        }
    }

    fn request(&self) -> ConnectRequest {
        ConnectRequest {
            dialect: self.dialect.as_str().to_string(),
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port.to_string(),
            database: self.database.clone(),
        }
    }

    /// A server already connected to this database.
    async fn connected_server(&self) -> SqlAdvisorServer {
        let server = SqlAdvisorServer::new(Config::default());
        assert_ok!(server.manager().connect(self.request()).await);
        server
    }
}

fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text())
        .map(|t| t.text.clone())
        .collect::<Vec<_>>()
        .join("\n")
}

const DIALECTS: [Dialect; 2] = [Dialect::MySql, Dialect::PostgreSql];

// =============================================================================
// Connection Tests
// =============================================================================

mod connection_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    #[serial]
    async fn test_connect_then_list_tables_agree() {
        for dialect in DIALECTS {
            let db = TestDatabase::for_dialect(dialect).await;
            let server = db.connected_server().await;
            server
                .manager()
                .run_statement("CREATE TABLE advisor_probe (id INT)")
                .await
                .expect("create table");

            let summary = server
                .manager()
                .connect(db.request())
                .await
                .expect("reconnect");
            let listed = server.manager().list_tables().await.expect("list tables");

            assert_eq!(summary.dialect, dialect);
            assert!(summary.tables.contains(&"advisor_probe".to_string()));
            assert_eq!(summary.tables, listed);

            assert_ok!(server.manager().drop_table("advisor_probe").await);
        }
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    #[serial]
    async fn test_bad_credentials_leave_state_unset() {
        let db = TestDatabase::postgres().await;
        let server = db.connected_server().await;

        let mut request = db.request();
        request.password = "definitely-wrong".to_string();
        assert_err!(server.manager().connect(request).await);

        let err = server.manager().list_tables().await.unwrap_err();
        assert!(err.is_not_connected());
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    #[serial]
    async fn test_unreachable_port() {
        let server = SqlAdvisorServer::new(Config {
            connect_timeout: Duration::from_secs(5),
            ..Config::default()
        });
        let request = ConnectRequest {
            dialect: "mysql".into(),
            user: "root".into(),
            password: String::new(),
            host: "127.0.0.1".into(),
            port: "1".into(),
            database: "test".into(),
        };

        assert_err!(server.manager().connect(request).await);
        assert_eq!(server.active_dialect(), None);
    }
}

// =============================================================================
// Query Tests
// =============================================================================

mod query_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    #[serial]
    async fn test_run_query_dual_mode() {
        for dialect in DIALECTS {
            let db = TestDatabase::for_dialect(dialect).await;
            let server = db.connected_server().await;
            let manager = server.manager();

            assert_ok!(manager.drop_table("people").await);
            assert_ok!(
                manager
                    .create_table("people", "id INT PRIMARY KEY, name VARCHAR(50), note TEXT")
                    .await
            );

            let insert = manager
                .run_statement(
                    "INSERT INTO people (id, name, note) VALUES (2, 'Bob', NULL), (1, 'Alice', 'x')",
                )
                .await
                .expect("insert");
            assert_eq!(insert, StatementOutcome::Executed { rows_affected: 2 });

            let result = server
                .run_query(Parameters(QueryInput {
                    query: "SELECT id, name, note FROM people ORDER BY id DESC".into(),
                }))
                .await
                .expect("run_query");
            assert_eq!(text_of(&result), "(2, 'Bob', NULL)\n(1, 'Alice', 'x')");

            let empty = manager
                .run_statement("SELECT id FROM people WHERE id = 42")
                .await
                .expect("empty select");
            assert!(matches!(empty, StatementOutcome::Rows(ref r) if r.is_empty()));

            let update = server
                .run_query(Parameters(QueryInput {
                    query: "UPDATE people SET name = 'Robert' WHERE id = 2".into(),
                }))
                .await
                .expect("update");
            assert_eq!(text_of(&update), "Query executed successfully");

            assert_ok!(manager.drop_table("people").await);
        }
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    #[serial]
    async fn test_syntax_error_is_reported() {
        let db = TestDatabase::mysql().await;
        let server = db.connected_server().await;

        let result = server
            .run_query(Parameters(QueryInput {
                query: "SELEC 1".into(),
            }))
            .await
            .expect("run_query");
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).starts_with("Error: "));
        // The connection stays configured after a statement failure.
        assert_eq!(server.active_dialect(), Some(Dialect::MySql));
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    #[serial]
    async fn test_explain_returns_plan_rows() {
        for dialect in DIALECTS {
            let db = TestDatabase::for_dialect(dialect).await;
            let server = db.connected_server().await;

            let plan = server.manager().explain("SELECT 1").await.expect("explain");
            assert!(!plan.is_empty());
        }
    }
}

// =============================================================================
// Schema Tests
// =============================================================================

mod schema_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Docker"]
    #[serial]
    async fn test_drop_missing_table_succeeds() {
        for dialect in DIALECTS {
            let db = TestDatabase::for_dialect(dialect).await;
            let server = db.connected_server().await;
            assert_ok!(server.manager().drop_table("no_such_table_here").await);
        }
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    #[serial]
    async fn test_schema_changes_and_describe() {
        for dialect in DIALECTS {
            let db = TestDatabase::for_dialect(dialect).await;
            let server = db.connected_server().await;
            let manager = server.manager();

            assert_ok!(manager.drop_table("orders").await);
            assert_ok!(manager.drop_table("customers").await);
            assert_ok!(manager.create_table("customers", "id INT PRIMARY KEY").await);
            assert_ok!(manager.create_table("orders", "id INT PRIMARY KEY, customer_id INT").await);
            assert_ok!(manager.add_column("customers", "email VARCHAR(255)").await);
            assert_ok!(
                manager
                    .add_foreign_key("orders", "customer_id", "customers", "id")
                    .await
            );

            let columns = manager.describe_table("customers").await.expect("describe");
            let names: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
            assert_eq!(names, vec!["id", "email"]);

            let described = server
                .describe_table(Parameters(TableNameInput {
                    table_name: "customers".into(),
                }))
                .await
                .expect("describe_table");
            assert!(text_of(&described).starts_with("id: int"));

            let schema = manager.dump_schema().await.expect("dump schema");
            match dialect {
                Dialect::MySql => {
                    assert!(schema.contains("CREATE TABLE `customers`"));
                    assert!(schema.contains("FOREIGN KEY (`customer_id`)"));
                }
                Dialect::PostgreSql => {
                    assert!(schema.contains("Table: customers\nid: integer\nemail: character varying"));
                    assert!(schema.contains("Table: orders"));
                }
            }
            assert!(schema.contains("\n\n"));

            assert_ok!(manager.drop_table("orders").await);
            assert_ok!(manager.drop_table("customers").await);
        }
    }
}
