//! Event types for the per-process causal log.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::topology::ProcessId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Internal,
    Send,
    Receive,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::Internal => "INTERNAL",
            EventKind::Send => "SEND",
            EventKind::Receive => "RECEIVE",
        })
    }
}

/// An entry in a process's event log. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Position in the recorder's append order, starting at 1.
    pub seq: u64,
    pub kind: EventKind,
    pub actor: ProcessId,
    pub description: String,
    /// Clock value right after the mutation that produced this event.
    pub clock: u64,
    pub wall_time: DateTime<Utc>,
    pub run_id: Uuid,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] {} clock={}",
            self.wall_time.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            self.description,
            self.clock
        )
    }
}
