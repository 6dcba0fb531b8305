use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use lamport_common::{load_topology, ProcessId};
use lamport_node::{spawn_node, telemetry, HttpMessenger, ProcessContext};

#[derive(Parser)]
#[command(name = "lamport-node")]
#[command(about = "Run one process of the causally ordered cluster")]
#[command(version)]
struct Cli {
    /// Which process of the topology to run (e.g. P1)
    #[arg(short, long, env = "LAMPORT_PROCESS")]
    process: String,

    /// Cluster config file; the built-in five-process ring when omitted
    #[arg(short, long, env = "LAMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind instead of the configured host (e.g. 0.0.0.0)
    #[arg(long, env = "LAMPORT_LISTEN_HOST")]
    listen_host: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs);

    let topology = Arc::new(load_topology(cli.config.as_deref())?);
    let id = ProcessId::new(cli.process);
    let spec = topology.require(&id)?.clone();

    let bind_addr = format!(
        "{}:{}",
        cli.listen_host.as_deref().unwrap_or(&spec.host),
        spec.port
    );
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr} for {id}"))?;

    let messenger = Arc::new(HttpMessenger::new(topology.message_timeout())?);
    let ctx = Arc::new(ProcessContext::new(spec));
    info!(
        process = %id,
        run_id = %ctx.recorder.run_id(),
        notify = ?ctx.spec.notify,
        awaits = ?ctx.spec.awaits,
        "Starting process"
    );

    let mut node = spawn_node(ctx, topology, messenger, listener)?;

    tokio::select! {
        result = node.wait_server() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            warn!(process = %id, "Interrupted, shutting down");
        }
    }
    node.shutdown();

    Ok(())
}
