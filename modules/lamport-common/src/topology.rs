//! Static communication topology.
//!
//! Each process has at most one peer it notifies and at most one peer it
//! waits on. The table is fixed at startup and read-only afterwards.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TopologyError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(String);

impl ProcessId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProcessId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProcessId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which work service a process exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Math,
    Average,
    Matrix,
    Sort,
    Search,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceKind::Math => "math",
            ServiceKind::Average => "average",
            ServiceKind::Matrix => "matrix",
            ServiceKind::Sort => "sort",
            ServiceKind::Search => "search",
        })
    }
}

/// The computation a process's causal task performs in its COMPUTING step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LocalTask {
    MathSuite { a: f64, b: f64 },
    Factorial { n: u32 },
    MatrixProduct,
    Quicksort { count: usize, max: i64 },
    Average { count: usize, max: f64 },
}

impl LocalTask {
    /// Sampling ranges must be non-empty; `random_range` panics otherwise.
    pub fn check(&self) -> Result<(), String> {
        match self {
            LocalTask::MathSuite { a, b } if !a.is_finite() || !b.is_finite() => {
                Err(format!("operands must be finite, got {a} and {b}"))
            }
            LocalTask::Quicksort { max, .. } if *max < 0 => {
                Err(format!("quicksort max must be >= 0, got {max}"))
            }
            LocalTask::Average { max, .. } if !max.is_finite() || *max <= 0.0 => {
                Err(format!("average max must be finite and > 0, got {max}"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSpec {
    pub id: ProcessId,
    pub host: String,
    pub port: u16,
    pub service: ServiceKind,
    pub task: LocalTask,
    /// Peer notified in the SENDING step.
    pub notify: Option<ProcessId>,
    /// Peer whose message gates the COMPUTING step.
    pub awaits: Option<ProcessId>,
    pub wait_timeout: Duration,
    pub start_delay: Duration,
}

impl ProcessSpec {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    processes: Vec<ProcessSpec>,
    message_timeout: Duration,
    ready_timeout: Duration,
}

impl Topology {
    pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(
        processes: Vec<ProcessSpec>,
        message_timeout: Duration,
        ready_timeout: Duration,
    ) -> Result<Self, TopologyError> {
        let topology = Self {
            processes,
            message_timeout,
            ready_timeout,
        };
        topology.validate()?;
        Ok(topology)
    }

    /// The five-process cycle P1 → P3 → P5 → P4 → P2 → P1 on 127.0.0.1:50051-50055.
    pub fn reference() -> Self {
        fn spec(
            id: &str,
            port: u16,
            service: ServiceKind,
            task: LocalTask,
            notify: &str,
            awaits: Option<(&str, u64)>,
        ) -> ProcessSpec {
            ProcessSpec {
                id: ProcessId::from(id),
                host: "127.0.0.1".to_string(),
                port,
                service,
                task,
                notify: Some(ProcessId::from(notify)),
                awaits: awaits.map(|(peer, _)| ProcessId::from(peer)),
                wait_timeout: awaits
                    .map(|(_, secs)| Duration::from_secs(secs))
                    .unwrap_or(Topology::DEFAULT_WAIT_TIMEOUT),
                start_delay: Duration::ZERO,
            }
        }

        Self {
            processes: vec![
                spec(
                    "P1",
                    50051,
                    ServiceKind::Math,
                    LocalTask::MathSuite { a: 25.5, b: 10.3 },
                    "P3",
                    None,
                ),
                spec(
                    "P2",
                    50052,
                    ServiceKind::Average,
                    LocalTask::Factorial { n: 8 },
                    "P1",
                    Some(("P4", 25)),
                ),
                spec(
                    "P3",
                    50053,
                    ServiceKind::Matrix,
                    LocalTask::MatrixProduct,
                    "P5",
                    Some(("P1", 10)),
                ),
                spec(
                    "P4",
                    50054,
                    ServiceKind::Sort,
                    LocalTask::Quicksort { count: 100, max: 100 },
                    "P2",
                    Some(("P5", 20)),
                ),
                spec(
                    "P5",
                    50055,
                    ServiceKind::Search,
                    LocalTask::Average { count: 50, max: 10.0 },
                    "P4",
                    Some(("P3", 15)),
                ),
            ],
            message_timeout: Self::DEFAULT_MESSAGE_TIMEOUT,
            ready_timeout: Self::DEFAULT_READY_TIMEOUT,
        }
    }

    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.processes.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut ids: HashSet<&ProcessId> = HashSet::new();
        let mut addresses: HashMap<String, &ProcessId> = HashMap::new();
        for process in &self.processes {
            if !ids.insert(&process.id) {
                return Err(TopologyError::DuplicateId(process.id.clone()));
            }
            if let Some(first) = addresses.insert(process.address(), &process.id) {
                return Err(TopologyError::DuplicateAddress {
                    address: process.address(),
                    first: first.clone(),
                    second: process.id.clone(),
                });
            }
        }

        for process in &self.processes {
            if let Err(reason) = process.task.check() {
                return Err(TopologyError::InvalidTask {
                    process: process.id.clone(),
                    reason,
                });
            }
            for peer in [&process.notify, &process.awaits].into_iter().flatten() {
                if *peer == process.id {
                    return Err(TopologyError::SelfLoop(process.id.clone()));
                }
                if !ids.contains(peer) {
                    return Err(TopologyError::UnknownPeer {
                        from: process.id.clone(),
                        to: peer.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn processes(&self) -> &[ProcessSpec] {
        &self.processes
    }

    pub fn process(&self, id: &ProcessId) -> Option<&ProcessSpec> {
        self.processes.iter().find(|p| &p.id == id)
    }

    pub fn process_mut(&mut self, id: &ProcessId) -> Option<&mut ProcessSpec> {
        self.processes.iter_mut().find(|p| &p.id == id)
    }

    pub fn require(&self, id: &ProcessId) -> Result<&ProcessSpec, TopologyError> {
        self.process(id)
            .ok_or_else(|| TopologyError::UnknownProcess(id.clone()))
    }

    /// The peer `id` notifies, resolved to its spec.
    pub fn target_of(&self, id: &ProcessId) -> Option<&ProcessSpec> {
        self.process(id)
            .and_then(|p| p.notify.as_ref())
            .and_then(|target| self.process(target))
    }

    pub fn message_timeout(&self) -> Duration {
        self.message_timeout
    }

    pub fn ready_timeout(&self) -> Duration {
        self.ready_timeout
    }

    pub fn with_message_timeout(mut self, timeout: Duration) -> Self {
        self.message_timeout = timeout;
        self
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }
}
