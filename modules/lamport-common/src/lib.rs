//! Shared building blocks for the causal-ordering processes: the logical
//! clock, the event log, the wire types and the static topology.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod protocol;
pub mod recorder;
pub mod topology;

pub use clock::LogicalClock;
pub use config::{load_config, load_topology, FileConfig};
pub use error::TopologyError;
pub use event::{Event, EventKind};
pub use protocol::*;
pub use recorder::{EventRecorder, EventSink, MemoryEventSink, TracingSink};
pub use topology::{LocalTask, ProcessId, ProcessSpec, ServiceKind, Topology};
