//! One-shot signal that gates a causal task on a message from a given peer.

use std::time::Duration;

use tokio::sync::watch;

use lamport_common::ProcessId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Signaled,
    TimedOut,
}

/// Armed for one awaited sender, signaled at most once, never reset.
#[derive(Debug)]
pub struct WaitGate {
    awaited: ProcessId,
    signaled: watch::Sender<bool>,
}

impl WaitGate {
    pub fn new(awaited: ProcessId) -> Self {
        let (signaled, _) = watch::channel(false);
        Self { awaited, signaled }
    }

    pub fn awaited(&self) -> &ProcessId {
        &self.awaited
    }

    pub fn is_signaled(&self) -> bool {
        *self.signaled.borrow()
    }

    /// Signal the gate if `sender` is the awaited peer. Returns true only for
    /// the call that actually opened it; later calls are no-ops.
    pub fn signal_from(&self, sender: &ProcessId) -> bool {
        if sender != &self.awaited {
            return false;
        }
        self.signaled.send_if_modified(|open| {
            if *open {
                false
            } else {
                *open = true;
                true
            }
        })
    }

    /// Wait until signaled or until `timeout` elapses. A gate that was
    /// signaled before the call returns immediately.
    pub async fn wait(&self, timeout: Duration) -> WaitOutcome {
        let mut rx = self.signaled.subscribe();
        // The borrowed `Ref` must be gone before `rx` drops.
        let outcome = match tokio::time::timeout(timeout, rx.wait_for(|open| *open)).await {
            Ok(Ok(_)) => WaitOutcome::Signaled,
            // The sender lives as long as the gate, so the channel can't close under us.
            Ok(Err(_)) | Err(_) => WaitOutcome::TimedOut,
        };
        outcome
    }
}
