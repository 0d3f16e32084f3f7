//! Narrow abstraction over the driver session.

use async_trait::async_trait;

use crate::query::{ExecutionOutcome, Query};

/// Opaque handle to a statement previously prepared on the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PreparedId(pub u64);

/// Errors from session lifecycle operations.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("connect: {0}")]
    Connect(String),
    #[error("prepare: {0}")]
    Prepare(String),
}

/// The query-execution primitive the retry core consumes.
///
/// Connection pooling, transport-level retries, and topology awareness all
/// belong to the driver behind this trait. Keeping the seam this small is
/// what lets retry behavior be tested against an in-memory fake instead of
/// a live cluster.
#[async_trait]
pub trait Session: Send + Sync {
    /// Establish or re-validate the underlying connection.
    async fn connect(&self) -> Result<(), SessionError>;

    /// Release the underlying connection.
    async fn disconnect(&self);

    /// Parse a statement server-side, returning a reusable handle.
    async fn prepare(&self, text: &str) -> Result<PreparedId, SessionError>;

    /// Execute one query attempt and classify the result.
    async fn execute(&self, query: &Query) -> ExecutionOutcome;
}
