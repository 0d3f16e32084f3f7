use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::DaoError;
use crate::query::{CqlValue, Row};

/// DAO payload describing one row of the `person` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub interesting_dates: Vec<SystemTime>,
}

impl Person {
    pub fn new(name: impl Into<String>, age: i32, interesting_dates: Vec<SystemTime>) -> Self {
        Self {
            name: name.into(),
            age,
            interesting_dates,
        }
    }

    /// Decode a raw driver row.
    ///
    /// Pure and idempotent: decoding the same row twice yields structurally
    /// equal values. Type coercions (integer timestamp to date) happen
    /// here; the retry core never inspects cell types. Older tables spell
    /// the name column `first_name`, so that spelling is accepted too.
    pub fn from_row(row: &Row) -> Result<Self, DaoError> {
        let name = match row.get("name").or_else(|| row.get("first_name")) {
            Some(CqlValue::Text(s)) => s.clone(),
            Some(other) => return Err(type_error("name", other)),
            None => return Err(DaoError::Protocol("row missing name column".into())),
        };
        let age = match row.get("age") {
            Some(CqlValue::Int(n)) => *n,
            Some(other) => return Err(type_error("age", other)),
            None => return Err(DaoError::Protocol("row missing age column".into())),
        };
        let interesting_dates = match row.get("interesting_dates") {
            None | Some(CqlValue::Null) => Vec::new(),
            Some(CqlValue::List(items)) => items
                .iter()
                .map(timestamp_cell)
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(type_error("interesting_dates", other)),
        };
        Ok(Self {
            name,
            age,
            interesting_dates,
        })
    }

    /// Bound values for the prepared insert, in column order
    /// `(name, age, interesting_dates)`.
    pub fn to_bound_values(&self) -> Vec<CqlValue> {
        let dates = self
            .interesting_dates
            .iter()
            .map(|t| CqlValue::Timestamp(epoch_millis(*t)))
            .collect();
        vec![
            CqlValue::Text(self.name.clone()),
            CqlValue::Int(self.age),
            CqlValue::List(dates),
        ]
    }
}

fn type_error(column: &str, value: &CqlValue) -> DaoError {
    DaoError::Protocol(format!("unexpected value for column {column}: {value:?}"))
}

fn timestamp_cell(value: &CqlValue) -> Result<SystemTime, DaoError> {
    match value {
        CqlValue::Timestamp(ms) | CqlValue::Bigint(ms) => Ok(time_from_millis(*ms)),
        other => Err(type_error("interesting_dates", other)),
    }
}

fn time_from_millis(ms: i64) -> SystemTime {
    if ms >= 0 {
        UNIX_EPOCH + Duration::from_millis(ms as u64)
    } else {
        UNIX_EPOCH - Duration::from_millis(ms.unsigned_abs())
    }
}

fn epoch_millis(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as i64,
        Err(e) => -(e.duration().as_millis() as i64),
    }
}
