//! Exercise every process's work service from outside the ring and print
//! what each call did to the probe's own logical clock.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use lamport_common::{load_topology, ProcessId};
use lamport_node::probe::Prober;
use lamport_node::telemetry;

#[derive(Parser)]
#[command(name = "lamport-probe")]
#[command(about = "Call each process's work service and report clocks")]
#[command(version)]
struct Cli {
    /// Cluster config file; the built-in five-process ring when omitted
    #[arg(short, long, env = "LAMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Only probe these processes (repeatable)
    #[arg(short, long = "only")]
    only: Vec<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Returns whether every selected process answered.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs);

    let topology = load_topology(cli.config.as_deref())?;
    let only: Vec<ProcessId> = cli.only.into_iter().map(ProcessId::from).collect();
    for id in &only {
        topology.require(id)?;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let prober = Prober::new(Duration::from_millis(cli.timeout_ms));
    let report = runtime.block_on(async {
        if only.is_empty() {
            prober.run(&topology).await
        } else {
            let mut report = lamport_node::probe::ProbeReport::default();
            for id in &only {
                if let Ok(spec) = topology.require(id) {
                    if let Err(failure) = prober.probe_process(spec, &mut report).await {
                        report.failures.push(failure);
                    }
                }
            }
            report.final_clock = prober.clock();
            report
        }
    });

    println!(
        "{:<4} {:<18} {:>5} {:>6} {:>7}  {:<26} detail",
        "proc", "operation", "sent", "reply", "merged", "status"
    );
    for call in &report.calls {
        println!(
            "{:<4} {:<18} {:>5} {:>6} {:>7}  {:<26} {}",
            call.process.as_str(),
            call.operation,
            call.sent_clock,
            call.reply_clock,
            call.merged_clock,
            call.status,
            call.detail
        );
    }
    for failure in &report.failures {
        println!(
            "{:<4} {:<18} unreachable: {}",
            failure.process.as_str(),
            failure.operation,
            failure.reason
        );
    }
    println!("final probe clock: {}", report.final_clock);

    Ok(report.failures.is_empty())
}
