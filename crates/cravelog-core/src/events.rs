use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a logged craving ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Resisted,
    Succumbed,
}

/// A single entry from the event store.
///
/// The store owns these; the digest only ever reads a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub outcome: Outcome,
}

impl LoggedEvent {
    pub fn new(timestamp: DateTime<Utc>, name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            timestamp,
            name: name.into(),
            outcome,
        }
    }

    pub fn resisted(&self) -> bool {
        self.outcome == Outcome::Resisted
    }
}
