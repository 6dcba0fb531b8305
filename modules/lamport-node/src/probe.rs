//! Probe: an external caller that exercises every process's work service
//! while keeping its own logical clock.
//!
//! Each call ticks and records a SEND, stamps the request, merges the
//! response timestamp and records a RECEIVE.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use lamport_common::{
    AverageRequest, Event, EventKind, EventRecorder, LogicalClock, MathRequest, MatrixRequest,
    MemoryEventSink, ProcessId, ProcessSpec, SearchRequest, ServiceKind, SortRequest, Topology,
    TracingSink,
};
use lamport_work::MathOp;

use crate::client::WorkClient;
use crate::messenger::MessengerError;

pub const PROBE_ACTOR: &str = "CLIENT";

/// One request/response exchange as seen by the probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeCall {
    pub process: ProcessId,
    pub operation: String,
    pub sent_clock: u64,
    pub reply_clock: u64,
    pub merged_clock: u64,
    pub status: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeFailure {
    pub process: ProcessId,
    pub operation: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    pub calls: Vec<ProbeCall>,
    pub failures: Vec<ProbeFailure>,
    pub final_clock: u64,
}

pub struct Prober {
    clock: LogicalClock,
    recorder: EventRecorder,
    log: Arc<MemoryEventSink>,
    timeout: Duration,
}

impl Prober {
    pub fn new(timeout: Duration) -> Self {
        let log = Arc::new(MemoryEventSink::new());
        let recorder = EventRecorder::new(ProcessId::from(PROBE_ACTOR))
            .with_sink(Arc::new(TracingSink))
            .with_sink(log.clone());
        Self {
            clock: LogicalClock::new(),
            recorder,
            log,
            timeout,
        }
    }

    pub fn clock(&self) -> u64 {
        self.clock.current()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.events()
    }

    /// Probe every process in `topology`. Unreachable processes are reported
    /// and skipped.
    pub async fn run(&self, topology: &Topology) -> ProbeReport {
        let mut report = ProbeReport::default();
        for spec in topology.processes() {
            if let Err(failure) = self.probe_process(spec, &mut report).await {
                warn!(process = %spec.id, error = %failure.reason, "Probe skipped process");
                report.failures.push(failure);
            }
        }
        report.final_clock = self.clock.current();
        report
    }

    /// Exercise the service `spec` exposes, appending each completed call.
    pub async fn probe_process(
        &self,
        spec: &ProcessSpec,
        report: &mut ProbeReport,
    ) -> Result<(), ProbeFailure> {
        let client = WorkClient::new(spec, self.timeout).map_err(|e| ProbeFailure {
            process: spec.id.clone(),
            operation: "connect".to_string(),
            reason: format!("{e:#}"),
        })?;
        let sender = ProcessId::from(PROBE_ACTOR);

        match spec.service {
            ServiceKind::Math => {
                let operands = [(15.0, 7.0), (20.0, 8.0), (6.0, 4.0), (100.0, 5.0)];
                for (op, (num1, num2)) in MathOp::ALL.into_iter().zip(operands) {
                    self.call(&client, &op.to_string(), report, |timestamp| {
                        let client = client.clone();
                        let request = MathRequest {
                            sender_id: sender.clone(),
                            num1,
                            num2,
                            timestamp,
                        };
                        async move {
                            client.math(op, &request).await.map(|resp| {
                                let detail = format!("{num1} {op} {num2} = {}", resp.result);
                                (resp.timestamp, resp.status, detail)
                            })
                        }
                    })
                    .await?;
                }
                // Precondition failure path: the service answers with an error status.
                self.call(&client, "DIVIDE", report, |timestamp| {
                    let client = client.clone();
                    let request = MathRequest {
                        sender_id: sender.clone(),
                        num1: 1.0,
                        num2: 0.0,
                        timestamp,
                    };
                    async move {
                        client
                            .math(MathOp::Divide, &request)
                            .await
                            .map(|resp| (resp.timestamp, resp.status, "1 / 0".to_string()))
                    }
                })
                .await?;
            }
            ServiceKind::Average => {
                self.call(&client, "AVERAGE", report, |timestamp| {
                    let client = client.clone();
                    let request = AverageRequest {
                        sender_id: sender.clone(),
                        timestamp,
                        numbers: None,
                    };
                    async move {
                        client.average(&request).await.map(|resp| {
                            let detail = format!(
                                "average of {} numbers = {:.4}",
                                resp.numbers.len(),
                                resp.average
                            );
                            (resp.timestamp, resp.status, detail)
                        })
                    }
                })
                .await?;
            }
            ServiceKind::Matrix => {
                self.call(&client, "MULTIPLY_MATRICES", report, |timestamp| {
                    let client = client.clone();
                    let request = MatrixRequest {
                        sender_id: sender.clone(),
                        timestamp,
                        matrix_a: None,
                        matrix_b: None,
                    };
                    async move {
                        client.matrix(&request).await.map(|resp| {
                            let detail =
                                format!("{} * {} = {}", resp.matrix_a, resp.matrix_b, resp.result);
                            (resp.timestamp, resp.status, detail)
                        })
                    }
                })
                .await?;
            }
            ServiceKind::Sort => {
                self.call(&client, "QUICKSORT", report, |timestamp| {
                    let client = client.clone();
                    let request = SortRequest {
                        sender_id: sender.clone(),
                        timestamp,
                        numbers: None,
                    };
                    async move {
                        client.sort(&request).await.map(|resp| {
                            let head: Vec<i64> =
                                resp.sorted_numbers.iter().take(10).copied().collect();
                            let detail = format!(
                                "sorted {} numbers, first 10: {head:?}",
                                resp.sorted_numbers.len()
                            );
                            (resp.timestamp, resp.status, detail)
                        })
                    }
                })
                .await?;
            }
            ServiceKind::Search => {
                self.call(&client, "LINEAR_SEARCH", report, |timestamp| {
                    let client = client.clone();
                    let request = SearchRequest {
                        sender_id: sender.clone(),
                        timestamp,
                        numbers: None,
                        targets: None,
                    };
                    async move {
                        client.search(&request).await.map(|resp| {
                            let hits: Vec<String> = resp
                                .results
                                .iter()
                                .map(|hit| format!("{}@{}", hit.value, hit.position))
                                .collect();
                            let detail = format!(
                                "searched {} numbers: {}",
                                resp.numbers.len(),
                                hits.join(", ")
                            );
                            (resp.timestamp, resp.status, detail)
                        })
                    }
                })
                .await?;
            }
        }

        Ok(())
    }

    async fn call<F, Fut>(
        &self,
        client: &WorkClient,
        operation: &str,
        report: &mut ProbeReport,
        request: F,
    ) -> Result<(), ProbeFailure>
    where
        F: FnOnce(u64) -> Fut,
        Fut: std::future::Future<Output = Result<(u64, String, String), MessengerError>>,
    {
        let process = client.peer().clone();
        let sent_clock = self.clock.tick();
        self.recorder.record(
            EventKind::Send,
            format!("{PROBE_ACTOR} -> {process} op={operation}"),
            sent_clock,
        );

        let (reply_clock, status, detail) =
            request(sent_clock).await.map_err(|err| ProbeFailure {
                process: process.clone(),
                operation: operation.to_string(),
                reason: err.to_string(),
            })?;

        let merged_clock = self.clock.merge(reply_clock);
        self.recorder.record(
            EventKind::Receive,
            format!("{PROBE_ACTOR} <- {process} op={operation} status={status} {detail}"),
            merged_clock,
        );
        info!(%process, operation, %status, reply_clock, merged_clock, "Probe call complete");

        report.calls.push(ProbeCall {
            process,
            operation: operation.to_string(),
            sent_clock,
            reply_clock,
            merged_clock,
            status,
            detail,
        });
        Ok(())
    }
}
