//! Lamport logical clock.
//!
//! One clock per process, shared between the RPC handlers and the causal
//! task. All mutations are a single atomic read-modify-write, so the value
//! never goes backwards no matter how handlers interleave.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct LogicalClock {
    value: AtomicU64,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local or outbound event: `value += 1`. Returns the new value.
    pub fn tick(&self) -> u64 {
        self.update(|v| v.saturating_add(1))
    }

    /// Inbound event: `value = max(value, received) + 1`. Returns the new value.
    pub fn merge(&self, received: u64) -> u64 {
        self.update(|v| v.max(received).saturating_add(1))
    }

    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    fn update(&self, f: impl Fn(u64) -> u64) -> u64 {
        // The closure never returns None, so both arms carry the previous value.
        let prev = match self
            .value
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| Some(f(v)))
        {
            Ok(prev) | Err(prev) => prev,
        };
        f(prev)
    }
}
