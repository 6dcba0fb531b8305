use thiserror::Error;

use crate::topology::ProcessId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("topology has no processes")]
    Empty,

    #[error("duplicate process id: {0}")]
    DuplicateId(ProcessId),

    #[error("address {address} is assigned to both {first} and {second}")]
    DuplicateAddress {
        address: String,
        first: ProcessId,
        second: ProcessId,
    },

    #[error("{from} references unknown process {to}")]
    UnknownPeer { from: ProcessId, to: ProcessId },

    #[error("{0} cannot notify or await itself")]
    SelfLoop(ProcessId),

    #[error("unknown process: {0}")]
    UnknownProcess(ProcessId),

    #[error("{process} has an invalid task: {reason}")]
    InvalidTask { process: ProcessId, reason: String },
}
