use std::sync::Arc;

use lamport_common::{
    Event, EventKind, EventRecorder, LogicalClock, MemoryEventSink, ProcessId, ProcessSpec,
    TracingSink,
};

use crate::gate::WaitGate;

/// Everything a process owns: its clock, its event log and, when the
/// topology says it waits on a peer, its wait gate. Shared by the RPC
/// handlers and the causal task through an `Arc`.
pub struct ProcessContext {
    pub id: ProcessId,
    pub spec: ProcessSpec,
    pub clock: LogicalClock,
    pub recorder: EventRecorder,
    pub log: Arc<MemoryEventSink>,
    pub gate: Option<WaitGate>,
}

impl ProcessContext {
    pub fn new(spec: ProcessSpec) -> Self {
        let log = Arc::new(MemoryEventSink::new());
        let recorder = EventRecorder::new(spec.id.clone())
            .with_sink(Arc::new(TracingSink))
            .with_sink(log.clone());
        let gate = spec.awaits.clone().map(WaitGate::new);

        Self {
            id: spec.id.clone(),
            spec,
            clock: LogicalClock::new(),
            recorder,
            log,
            gate,
        }
    }

    /// Merge an inbound timestamp and record the RECEIVE. Returns the merged clock.
    pub fn receive(&self, timestamp: u64, description: impl Into<String>) -> u64 {
        let clock = self.clock.merge(timestamp);
        self.recorder.record(EventKind::Receive, description, clock);
        clock
    }

    /// Tick for a local computation and record it. Returns the new clock.
    pub fn internal(&self, description: impl Into<String>) -> u64 {
        let clock = self.clock.tick();
        self.recorder.record(EventKind::Internal, description, clock);
        clock
    }

    /// Tick for an outbound message and record the SEND. The returned value is
    /// the timestamp to put on the wire.
    pub fn send(&self, description: impl Into<String>) -> u64 {
        let clock = self.clock.tick();
        self.recorder.record(EventKind::Send, description, clock);
        clock
    }

    /// Fold a peer's acknowledged clock back in after a round trip.
    pub fn absorb_ack(&self, peer: &ProcessId, peer_clock: u64) -> u64 {
        let clock = self.clock.merge(peer_clock);
        self.recorder.record(
            EventKind::Internal,
            format!("{} <- ack from {peer}", self.id),
            clock,
        );
        clock
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.events()
    }
}
