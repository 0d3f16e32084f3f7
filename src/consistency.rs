use std::fmt;

use serde::{Deserialize, Serialize};

/// Tunable consistency options mirroring Cassandra's levels.
///
/// No general "strength" ordering is assumed; the only sequence that
/// matters is the deterministic one produced by [`ConsistencyLadder`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyLevel {
    One,
    Quorum,
    All,
}

impl ConsistencyLevel {
    /// The next weaker, more-available level. `ONE` is the floor.
    pub fn downgraded(self) -> Self {
        match self {
            Self::All => Self::Quorum,
            Self::Quorum | Self::One => Self::One,
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::One => "ONE",
            Self::Quorum => "QUORUM",
            Self::All => "ALL",
        };
        f.write_str(s)
    }
}

/// Pure policy mapping an attempt index and starting level to the
/// consistency used for that attempt.
///
/// Attempt 0 runs at the caller's level; each later attempt steps down one
/// rung and then stays at the weakest level, so the ladder never runs out
/// of levels before the retry budget does.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConsistencyLadder;

impl ConsistencyLadder {
    pub fn level_for(&self, attempt: u32, initial: ConsistencyLevel) -> ConsistencyLevel {
        let mut level = initial;
        for _ in 0..attempt {
            level = level.downgraded();
        }
        level
    }
}
