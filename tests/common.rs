#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cqlretry::{
    ConsistencyLevel, CqlValue, ExecutionOutcome, PreparedId, Query, Row, Session, SessionError,
    Statement,
};

/// Recorded activity for one executed query attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct Executed {
    pub text: String,
    pub consistency: ConsistencyLevel,
    pub values: Vec<CqlValue>,
}

/// In-memory driver-session fake.
///
/// Outcomes are primed per statement text and every attempt is recorded,
/// standing in for a priming/activity mock server. Once a primed queue
/// drains, further executions of that statement succeed with no rows.
#[derive(Default)]
pub struct RecordingSession {
    scripts: Mutex<HashMap<String, VecDeque<ExecutionOutcome>>>,
    executed: Mutex<Vec<Executed>>,
    prepared: Mutex<HashMap<u64, String>>,
    next_id: AtomicU64,
    connects: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `outcomes` for successive executions of `text`.
    pub fn prime(&self, text: &str, outcomes: Vec<ExecutionOutcome>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(text.to_string())
            .or_default()
            .extend(outcomes);
    }

    /// Delay every subsequent execution, for driving deadline expiry.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.executed.lock().unwrap().clone()
    }

    /// Recorded attempts whose statement text equals `text`.
    pub fn executed_for(&self, text: &str) -> Vec<Executed> {
        self.executed()
            .into_iter()
            .filter(|e| e.text == text)
            .collect()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    fn text_of(&self, statement: &Statement) -> String {
        match statement {
            Statement::Simple(text) => text.clone(),
            Statement::Prepared { handle, .. } => self
                .prepared
                .lock()
                .unwrap()
                .get(&handle.0)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn connect(&self) -> Result<(), SessionError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {}

    async fn prepare(&self, text: &str) -> Result<PreparedId, SessionError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.prepared.lock().unwrap().insert(id, text.to_string());
        Ok(PreparedId(id))
    }

    async fn execute(&self, query: &Query) -> ExecutionOutcome {
        let text = self.text_of(&query.statement);
        let values = match &query.statement {
            Statement::Prepared { values, .. } => values.clone(),
            Statement::Simple(_) => Vec::new(),
        };
        self.executed.lock().unwrap().push(Executed {
            text: text.clone(),
            consistency: query.consistency,
            values,
        });
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.scripts.lock().unwrap().get_mut(&text).and_then(|q| q.pop_front());
        next.unwrap_or_else(|| ExecutionOutcome::Success(Vec::new()))
    }
}

/// Build a `person` row like the ones the reference cluster returns.
pub fn person_row(name: &str, age: i32, dates_ms: &[i64]) -> Row {
    let mut row = Row::new();
    row.insert("name".to_string(), CqlValue::Text(name.to_string()));
    row.insert("age".to_string(), CqlValue::Int(age));
    row.insert(
        "interesting_dates".to_string(),
        CqlValue::List(dates_ms.iter().map(|ms| CqlValue::Timestamp(*ms)).collect()),
    );
    row
}
