//! Person DAO built on the resilient executor.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::consistency::ConsistencyLevel;
use crate::error::DaoError;
use crate::executor::{OperationKind, QueryExecutor, RetryPolicy};
use crate::person::Person;
use crate::query::{CqlValue, ExecutionOutcome, Query, Statement};
use crate::session::{PreparedId, Session};

const SELECT_ALL: &str = "select * from person";
const SELECT_BY_NAME: &str = "select * from person where name = ?";
const INSERT_PERSON: &str = "insert into person(name, age, interesting_dates) values (?,?,?)";

/// Construction-time configuration for [`PersonDao`].
///
/// Deserializable so embedders can load it from a config file; every field
/// has a default matching the reference deployment.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DaoConfig {
    pub host: String,
    pub port: u16,
    pub keyspace: String,
    /// Retry budget per logical query; 0 means a single attempt.
    pub max_retries: u32,
    pub read_consistency: ConsistencyLevel,
    pub write_consistency: ConsistencyLevel,
    /// Per-attempt driver deadline in milliseconds; `None` disables it.
    pub request_timeout_ms: Option<u64>,
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9042,
            keyspace: "people".to_string(),
            max_retries: 1,
            read_consistency: ConsistencyLevel::Quorum,
            write_consistency: ConsistencyLevel::One,
            request_timeout_ms: Some(500),
        }
    }
}

struct PreparedStatements {
    insert: PreparedId,
    select_by_name: PreparedId,
}

#[derive(Default)]
struct ConnectionState {
    connected: bool,
    prepared: Option<PreparedStatements>,
}

/// Data-access object for the `person` table.
///
/// Holds an explicit session collaborator and a [`QueryExecutor`]
/// configured once at construction; individual calls carry no shared
/// mutable state beyond the connection lifecycle guard.
pub struct PersonDao {
    session: Arc<dyn Session>,
    executor: QueryExecutor,
    config: DaoConfig,
    state: Mutex<ConnectionState>,
}

impl PersonDao {
    pub fn new(session: Arc<dyn Session>, config: DaoConfig) -> Self {
        let executor = QueryExecutor::new(RetryPolicy {
            max_retries: config.max_retries,
        });
        Self {
            session,
            executor,
            config,
            state: Mutex::new(ConnectionState::default()),
        }
    }

    /// Establish the session, run the bootstrap statement, and prepare the
    /// DAO's statements.
    ///
    /// Idempotent: while connected, repeat calls issue no further queries.
    pub async fn connect(&self) -> Result<(), DaoError> {
        let mut state = self.state.lock().await;
        if state.connected {
            return Ok(());
        }
        self.session.connect().await?;
        self.bootstrap().await?;
        state.prepared = Some(PreparedStatements {
            insert: self.session.prepare(INSERT_PERSON).await?,
            select_by_name: self.session.prepare(SELECT_BY_NAME).await?,
        });
        state.connected = true;
        info!(keyspace = %self.config.keyspace, host = %self.config.host, port = self.config.port, "session connected");
        Ok(())
    }

    /// Release the session. A later [`connect`](Self::connect) bootstraps
    /// again from scratch.
    pub async fn disconnect(&self) {
        let mut state = self.state.lock().await;
        if state.connected {
            self.session.disconnect().await;
            state.connected = false;
            state.prepared = None;
            info!("session disconnected");
        }
    }

    /// Fetch every person at the configured read consistency.
    pub async fn retrieve_people(&self) -> Result<Vec<Person>, DaoError> {
        let rows = self
            .executor
            .execute(
                self.session.as_ref(),
                Statement::simple(SELECT_ALL),
                self.config.read_consistency,
                OperationKind::Read,
                self.request_timeout(),
            )
            .await?;
        rows.iter().map(Person::from_row).collect()
    }

    /// Fetch people matching `name` via the prepared select.
    pub async fn retrieve_people_by_name(&self, name: &str) -> Result<Vec<Person>, DaoError> {
        let handle = self.prepared(|p| p.select_by_name).await?;
        let rows = self
            .executor
            .execute(
                self.session.as_ref(),
                Statement::prepared(handle, vec![CqlValue::Text(name.to_string())]),
                self.config.read_consistency,
                OperationKind::Read,
                self.request_timeout(),
            )
            .await?;
        rows.iter().map(Person::from_row).collect()
    }

    /// Persist `person` via the prepared insert at the configured write
    /// consistency.
    pub async fn store_person(&self, person: &Person) -> Result<(), DaoError> {
        let handle = self.prepared(|p| p.insert).await?;
        self.executor
            .execute(
                self.session.as_ref(),
                Statement::prepared(handle, person.to_bound_values()),
                self.config.write_consistency,
                OperationKind::Write,
                self.request_timeout(),
            )
            .await?;
        Ok(())
    }

    /// Issue the `USE <keyspace>` bootstrap statement at the weakest level.
    ///
    /// Deliberately bypasses the retry loop: one logical connect issues
    /// exactly one bootstrap statement, and a failure here is a connect
    /// failure rather than a query-path domain error.
    async fn bootstrap(&self) -> Result<(), DaoError> {
        let query = Query {
            statement: Statement::simple(format!("USE {}", self.config.keyspace)),
            consistency: ConsistencyLevel::One,
            timeout: None,
        };
        match self.session.execute(&query).await {
            ExecutionOutcome::Success(_) => Ok(()),
            ExecutionOutcome::Recoverable(kind) => {
                Err(DaoError::Protocol(format!("bootstrap failed: {kind}")))
            }
            ExecutionOutcome::Fatal(msg) => {
                Err(DaoError::Protocol(format!("bootstrap failed: {msg}")))
            }
        }
    }

    async fn prepared(
        &self,
        pick: impl Fn(&PreparedStatements) -> PreparedId,
    ) -> Result<PreparedId, DaoError> {
        let state = self.state.lock().await;
        state
            .prepared
            .as_ref()
            .map(pick)
            .ok_or_else(|| DaoError::Protocol("session not connected".into()))
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.config.request_timeout_ms.map(Duration::from_millis)
    }
}
