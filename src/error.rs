use std::fmt;

use crate::query::RecoverableKind;
use crate::session::SessionError;

/// Detail of the last failure observed before a terminal error was raised.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FailureDetail {
    /// Cluster-reported read timeout.
    ReadTimeout,
    /// Cluster-reported write timeout.
    WriteTimeout,
    /// The driver call itself exceeded its per-attempt deadline.
    DeadlineExceeded,
}

impl From<RecoverableKind> for FailureDetail {
    fn from(kind: RecoverableKind) -> Self {
        match kind {
            RecoverableKind::ReadTimeout => Self::ReadTimeout,
            RecoverableKind::WriteTimeout => Self::WriteTimeout,
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadTimeout => f.write_str("read timeout"),
            Self::WriteTimeout => f.write_str("write timeout"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Terminal errors surfaced to DAO callers.
///
/// Recoverable timeouts are fully absorbed by the retry loop; callers only
/// ever see one of these or a decoded result.
#[derive(thiserror::Error, Debug)]
pub enum DaoError {
    /// Read-path retries exhausted, or the read deadline expired.
    #[error("unable to retrieve after {attempts} attempts: {last}")]
    UnableToRetrieve { attempts: u32, last: FailureDetail },
    /// Write-path retries exhausted, or the write deadline expired.
    #[error("unable to persist after {attempts} attempts: {last}")]
    UnableToPersist { attempts: u32, last: FailureDetail },
    /// Any failure not recognized as a matching recoverable timeout.
    #[error("protocol: {0}")]
    Protocol(String),
}

impl From<SessionError> for DaoError {
    fn from(err: SessionError) -> Self {
        Self::Protocol(err.to_string())
    }
}
