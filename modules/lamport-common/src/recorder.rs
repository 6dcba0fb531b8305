//! EventRecorder: stamps events and fans them out to sinks.
//!
//! Recording never fails the caller. A sink that errors is logged and
//! skipped; the remaining sinks still receive the event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::event::{Event, EventKind};
use crate::topology::ProcessId;

/// Destination for recorded events.
pub trait EventSink: Send + Sync {
    fn append(&self, event: &Event) -> anyhow::Result<()>;
}

pub struct EventRecorder {
    actor: ProcessId,
    run_id: Uuid,
    next_seq: AtomicU64,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl EventRecorder {
    pub fn new(actor: ProcessId) -> Self {
        Self {
            actor,
            run_id: Uuid::new_v4(),
            next_seq: AtomicU64::new(1),
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn actor(&self) -> &ProcessId {
        &self.actor
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Append an event stamped with the current wall time.
    pub fn record(&self, kind: EventKind, description: impl Into<String>, clock: u64) -> Event {
        let event = Event {
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            kind,
            actor: self.actor.clone(),
            description: description.into(),
            clock,
            wall_time: Utc::now(),
            run_id: self.run_id,
        };

        for sink in &self.sinks {
            if let Err(err) = sink.append(&event) {
                warn!(actor = %self.actor, seq = event.seq, error = %err, "Event sink rejected event");
            }
        }

        event
    }
}

// ---------------------------------------------------------------------------
// TracingSink (console / log output)
// ---------------------------------------------------------------------------

/// Emits one structured `info` line per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn append(&self, event: &Event) -> anyhow::Result<()> {
        info!(
            kind = %event.kind,
            actor = %event.actor,
            clock = event.clock,
            wall_time = %event.wall_time.format("%Y-%m-%d %H:%M:%S%.3f"),
            "{}",
            event.description
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryEventSink (observable log, test capture)
// ---------------------------------------------------------------------------

/// Append-only in-memory log. Thread-safe; `events()` returns a snapshot.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<Event>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn of_kind(&self, kind: EventKind) -> Vec<Event> {
        self.events().into_iter().filter(|e| e.kind == kind).collect()
    }
}

impl EventSink for MemoryEventSink {
    fn append(&self, event: &Event) -> anyhow::Result<()> {
        self.events
            .lock()
            .map_err(|_| anyhow::anyhow!("event log lock poisoned"))?
            .push(event.clone());
        Ok(())
    }
}
