//! Per-process runtime: the RPC surface (inbox + work services), the peer
//! messenger, and the one-shot causal task that links the processes into a
//! single causally ordered run.

pub mod client;
pub mod context;
pub mod gate;
pub mod inbox;
pub mod local;
pub mod messenger;
pub mod node;
pub mod probe;
pub mod routes;
pub mod task;
pub mod telemetry;
pub mod work;

pub use client::WorkClient;
pub use context::ProcessContext;
pub use gate::{WaitGate, WaitOutcome};
pub use messenger::{notify, HttpMessenger, MessengerError, PeerMessenger};
pub use node::{spawn_node, NodeHandle};
pub use routes::build_router;
pub use task::{CausalTask, Phase, SendOutcome, TaskReport};
