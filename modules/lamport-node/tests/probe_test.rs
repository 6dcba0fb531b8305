//! The probe against a live cluster.

mod harness;

use std::time::Duration;

use lamport_common::{EventKind, ProcessId, Topology};
use lamport_node::probe::Prober;

use harness::start_cluster;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn probe_exercises_every_service() {
    let (topology, _nodes) = start_cluster(Topology::reference()).await;
    let prober = Prober::new(Duration::from_secs(2));

    let report = prober.run(&topology).await;

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    // Four math ops plus the division by zero, one call for every other service.
    assert_eq!(report.calls.len(), 9);

    for call in &report.calls {
        assert!(call.reply_clock > call.sent_clock, "{call:?}");
        assert_eq!(call.merged_clock, call.reply_clock.max(call.sent_clock) + 1);
    }
    let clocks: Vec<u64> = report.calls.iter().map(|c| c.sent_clock).collect();
    assert!(clocks.windows(2).all(|w| w[0] < w[1]));

    let zero_division = report
        .calls
        .iter()
        .find(|c| c.detail == "1 / 0")
        .unwrap();
    assert_eq!(zero_division.status, "ERROR: division by zero");
    assert_eq!(zero_division.process, ProcessId::from("P1"));

    let events = prober.events();
    assert_eq!(events.len(), 18);
    assert_eq!(events.iter().filter(|e| e.kind == EventKind::Send).count(), 9);
    assert_eq!(report.final_clock, prober.clock());
}

#[tokio::test]
async fn probe_reports_unreachable_process_and_moves_on() {
    let mut topology = Topology::reference();
    // Nothing listens on these ports in tests.
    for (i, id) in ["P1", "P2", "P3", "P4", "P5"].iter().enumerate() {
        let process = topology.process_mut(&ProcessId::from(*id)).unwrap();
        process.port = 1 + i as u16;
    }
    let prober = Prober::new(Duration::from_millis(300));

    let report = prober.run(&topology).await;

    assert!(report.calls.is_empty());
    assert_eq!(report.failures.len(), 5);
    // Each attempt still ticked before the request went out.
    assert_eq!(report.final_clock, 5);
    assert!(prober
        .events()
        .iter()
        .all(|e| e.kind == EventKind::Send));
}
