//! The causal task: a one-shot sequence run once per process lifetime.
//!
//! WAITING_INBOUND (only when the topology names an awaited peer)
//! → COMPUTING → SENDING (only when the topology names a target) → DONE.
//! Timeouts and delivery failures are logged and the sequence moves on.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use lamport_common::{ProcessSpec, Topology};

use crate::context::ProcessContext;
use crate::gate::WaitOutcome;
use crate::local;
use crate::messenger::{self, PeerMessenger};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingInbound,
    Computing,
    Sending,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Acknowledged {
        sent_clock: u64,
        peer_clock: u64,
        merged_clock: u64,
    },
    /// Delivery abandoned; the clock kept its post-send value.
    Failed { sent_clock: u64, reason: String },
}

impl SendOutcome {
    pub fn sent_clock(&self) -> u64 {
        match self {
            SendOutcome::Acknowledged { sent_clock, .. } | SendOutcome::Failed { sent_clock, .. } => {
                *sent_clock
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskReport {
    pub phases: Vec<Phase>,
    pub wait: Option<WaitOutcome>,
    pub computed_clock: u64,
    pub summary: String,
    pub send: Option<SendOutcome>,
    pub final_clock: u64,
}

pub struct CausalTask {
    ctx: Arc<ProcessContext>,
    topology: Arc<Topology>,
    messenger: Arc<dyn PeerMessenger>,
}

impl CausalTask {
    pub fn new(
        ctx: Arc<ProcessContext>,
        topology: Arc<Topology>,
        messenger: Arc<dyn PeerMessenger>,
    ) -> Self {
        Self {
            ctx,
            topology,
            messenger,
        }
    }

    pub fn initial_phase(&self) -> Phase {
        if self.ctx.gate.is_some() {
            Phase::WaitingInbound
        } else {
            Phase::Computing
        }
    }

    fn target(&self) -> Option<&ProcessSpec> {
        self.topology.target_of(&self.ctx.id)
    }

    pub async fn run(self) -> TaskReport {
        let delay = self.ctx.spec.start_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut report = TaskReport::default();
        let mut phase = self.initial_phase();
        loop {
            report.phases.push(phase);
            phase = match phase {
                Phase::WaitingInbound => {
                    report.wait = Some(self.wait_inbound().await);
                    Phase::Computing
                }
                Phase::Computing => {
                    let (clock, summary) = self.compute();
                    report.computed_clock = clock;
                    report.summary = summary;
                    if self.target().is_some() {
                        Phase::Sending
                    } else {
                        Phase::Done
                    }
                }
                Phase::Sending => {
                    report.send = self.send(&report.summary).await;
                    Phase::Done
                }
                Phase::Done => break,
            };
        }

        report.final_clock = self.ctx.clock.current();
        info!(
            process = %self.ctx.id,
            final_clock = report.final_clock,
            "Causal task done"
        );
        report
    }

    async fn wait_inbound(&self) -> WaitOutcome {
        let Some(gate) = &self.ctx.gate else {
            return WaitOutcome::Signaled;
        };
        let timeout = self.ctx.spec.wait_timeout;
        info!(process = %self.ctx.id, awaiting = %gate.awaited(), ?timeout, "Waiting for inbound message");

        let outcome = gate.wait(timeout).await;
        if outcome == WaitOutcome::TimedOut {
            warn!(
                process = %self.ctx.id,
                awaiting = %gate.awaited(),
                ?timeout,
                "Missed dependency: proceeding without the awaited message"
            );
        }
        outcome
    }

    fn compute(&self) -> (u64, String) {
        let summary = local::perform(&self.ctx.spec.task, &mut rand::rng());
        let clock = self.ctx.internal(format!("{} {summary}", self.ctx.id));
        (clock, summary)
    }

    async fn send(&self, summary: &str) -> Option<SendOutcome> {
        let target = self.target()?;
        if !self.await_ready(target).await {
            warn!(process = %self.ctx.id, peer = %target.id, "Peer not ready, sending anyway");
        }

        let payload = format!("hello {}, {summary}", target.id);
        let sent_clock = self.ctx.send(format!(
            "{} -> {} message='{payload}'",
            self.ctx.id, target.id
        ));

        let outcome = match messenger::notify(
            self.messenger.as_ref(),
            &self.ctx.id,
            target,
            &payload,
            sent_clock,
        )
        .await
        {
            Ok(peer_clock) => SendOutcome::Acknowledged {
                sent_clock,
                peer_clock,
                merged_clock: self.ctx.absorb_ack(&target.id, peer_clock),
            },
            Err(err) => {
                warn!(
                    process = %self.ctx.id,
                    peer = %err.peer(),
                    error = %err,
                    "Delivery abandoned, continuing with a causality gap"
                );
                SendOutcome::Failed {
                    sent_clock,
                    reason: err.to_string(),
                }
            }
        };
        Some(outcome)
    }

    /// Poll the peer's health endpoint until it answers or the cluster's
    /// ready timeout runs out. Each poll is cut off at the deadline.
    async fn await_ready(&self, target: &ProcessSpec) -> bool {
        let budget = self.topology.ready_timeout();
        if budget.is_zero() {
            return true;
        }
        let deadline = Instant::now() + budget;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match tokio::time::timeout(remaining, self.messenger.is_ready(target)).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(_) => return false,
            }
            tokio::time::sleep(READY_POLL_INTERVAL.min(remaining)).await;
        }
    }
}
