pub mod consistency;
pub mod dao;
pub mod error;
pub mod executor;
pub mod person;
pub mod query;
pub mod session;

pub use consistency::{ConsistencyLadder, ConsistencyLevel};
pub use dao::{DaoConfig, PersonDao};
pub use error::{DaoError, FailureDetail};
pub use executor::{OperationKind, QueryExecutor, RetryPolicy};
pub use person::Person;
pub use query::{CqlValue, ExecutionOutcome, Query, RecoverableKind, Row, Statement};
pub use session::{PreparedId, Session, SessionError};
