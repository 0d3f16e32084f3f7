//! Query values and per-attempt execution outcomes.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::consistency::ConsistencyLevel;
use crate::session::PreparedId;

/// Typed cell value as decoded from the driver's wire representation.
#[derive(Clone, Debug, PartialEq)]
pub enum CqlValue {
    Text(String),
    Int(i32),
    Bigint(i64),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    List(Vec<CqlValue>),
    Null,
}

/// A raw result row keyed by column name.
pub type Row = BTreeMap<String, CqlValue>;

/// A statement to execute: raw query text or a prepared handle with bound
/// values.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Simple(String),
    Prepared {
        handle: PreparedId,
        values: Vec<CqlValue>,
    },
}

impl Statement {
    pub fn simple(text: impl Into<String>) -> Self {
        Self::Simple(text.into())
    }

    pub fn prepared(handle: PreparedId, values: Vec<CqlValue>) -> Self {
        Self::Prepared { handle, values }
    }
}

/// Immutable description of one attempt against the driver session.
///
/// A retried logical query produces a new `Query` value differing only in
/// consistency; the statement and timeout carry over unchanged.
#[derive(Clone, Debug)]
pub struct Query {
    pub statement: Statement,
    pub consistency: ConsistencyLevel,
    /// Per-attempt execution deadline, fixed per call rather than
    /// cumulative across retries.
    pub timeout: Option<Duration>,
}

/// Which cluster-reported recoverable timeout occurred.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecoverableKind {
    ReadTimeout,
    WriteTimeout,
}

impl fmt::Display for RecoverableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadTimeout => f.write_str("read timeout"),
            Self::WriteTimeout => f.write_str("write timeout"),
        }
    }
}

/// Classified result of a single attempt, as reported by the session.
///
/// The retry loop branches on the tag instead of unwinding: recoverable
/// failures may consume retry slots, everything else is terminal.
#[derive(Clone, Debug)]
pub enum ExecutionOutcome {
    /// Decoded rows; empty for plain acknowledgements.
    Success(Vec<Row>),
    /// Insufficient replicas responded in time; may be absorbed by retry.
    Recoverable(RecoverableKind),
    /// Malformed statement, decode failure, lost connection; never retried.
    Fatal(String),
}
