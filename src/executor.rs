//! Sequential retry loop with consistency downgrade.

use std::fmt;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::consistency::{ConsistencyLadder, ConsistencyLevel};
use crate::error::{DaoError, FailureDetail};
use crate::query::{ExecutionOutcome, Query, RecoverableKind, Row, Statement};
use crate::session::Session;

/// Whether an operation reads or mutates.
///
/// Decides which recoverable timeout kind may consume retry slots and which
/// terminal error is raised on exhaustion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Read,
    Write,
}

impl OperationKind {
    fn absorbs(self, kind: RecoverableKind) -> bool {
        matches!(
            (self, kind),
            (Self::Read, RecoverableKind::ReadTimeout)
                | (Self::Write, RecoverableKind::WriteTimeout)
        )
    }

    fn terminal(self, attempts: u32, last: FailureDetail) -> DaoError {
        match self {
            Self::Read => DaoError::UnableToRetrieve { attempts, last },
            Self::Write => DaoError::UnableToPersist { attempts, last },
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Bounded-retry configuration. `max_retries == 0` means exactly one
/// attempt, no retries.
#[derive(Copy, Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 1 }
    }
}

/// Retry/downgrade engine around a driver session.
///
/// Each logical call is a strictly sequential attempt loop: no speculative
/// or parallel attempts, every attempt waits for the prior outcome. The
/// executor holds no per-call mutable state, so one instance serves
/// concurrent callers. Dropping the returned future aborts the in-flight
/// attempt and no further attempt is issued.
#[derive(Copy, Clone, Debug, Default)]
pub struct QueryExecutor {
    policy: RetryPolicy,
    ladder: ConsistencyLadder,
}

impl QueryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            ladder: ConsistencyLadder,
        }
    }

    /// Run one logical query, retrying recoverable timeouts at downgraded
    /// consistency up to the configured budget.
    ///
    /// A deadline, when present, bounds each individual driver call; expiry
    /// is terminal for the whole call rather than a silent retry, because
    /// an indefinitely hanging node must not be retried without bound.
    #[tracing::instrument(skip(self, session, statement))]
    pub async fn execute(
        &self,
        session: &dyn Session,
        statement: Statement,
        initial: ConsistencyLevel,
        kind: OperationKind,
        deadline: Option<Duration>,
    ) -> Result<Vec<Row>, DaoError> {
        let mut last: Option<RecoverableKind> = None;
        for attempt in 0..=self.policy.max_retries {
            let consistency = self.ladder.level_for(attempt, initial);
            if attempt > 0 {
                warn!(attempt, %consistency, "retrying at downgraded consistency");
            }
            let query = Query {
                statement: statement.clone(),
                consistency,
                timeout: deadline,
            };
            let outcome = match deadline {
                Some(limit) => match timeout(limit, session.execute(&query)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(attempt, "driver call exceeded per-attempt deadline");
                        return Err(kind.terminal(attempt + 1, FailureDetail::DeadlineExceeded));
                    }
                },
                None => session.execute(&query).await,
            };
            match outcome {
                ExecutionOutcome::Success(rows) => {
                    debug!(attempt, rows = rows.len(), "query succeeded");
                    return Ok(rows);
                }
                ExecutionOutcome::Recoverable(k) if kind.absorbs(k) => {
                    debug!(attempt, failure = %k, "recoverable timeout");
                    last = Some(k);
                }
                ExecutionOutcome::Recoverable(k) => {
                    return Err(DaoError::Protocol(format!("unexpected {k} on {kind} path")));
                }
                ExecutionOutcome::Fatal(msg) => return Err(DaoError::Protocol(msg)),
            }
        }
        let attempts = self.policy.max_retries + 1;
        let detail = last.map(FailureDetail::from).unwrap_or(match kind {
            OperationKind::Read => FailureDetail::ReadTimeout,
            OperationKind::Write => FailureDetail::WriteTimeout,
        });
        Err(kind.terminal(attempts, detail))
    }
}
