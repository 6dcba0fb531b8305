use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use lamport_common::Topology;

use crate::context::ProcessContext;
use crate::messenger::PeerMessenger;
use crate::routes::build_router;
use crate::task::{CausalTask, TaskReport};

/// A running process: its RPC server and its causal task, both on the
/// current runtime. Dropping the handle aborts both.
pub struct NodeHandle {
    ctx: Arc<ProcessContext>,
    local_addr: SocketAddr,
    server: Option<JoinHandle<std::io::Result<()>>>,
    task: Option<JoinHandle<TaskReport>>,
}

/// Start serving on `listener` and launch the causal task.
///
/// The server is up before the task starts, so a process never sends before
/// its own inbox can receive.
pub fn spawn_node(
    ctx: Arc<ProcessContext>,
    topology: Arc<Topology>,
    messenger: Arc<dyn PeerMessenger>,
    listener: TcpListener,
) -> std::io::Result<NodeHandle> {
    let local_addr = listener.local_addr()?;
    let app = build_router(ctx.clone());

    info!(process = %ctx.id, %local_addr, service = %ctx.spec.service, "Process listening");
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let task = tokio::spawn(CausalTask::new(ctx.clone(), topology, messenger).run());

    Ok(NodeHandle {
        ctx,
        local_addr,
        server: Some(server),
        task: Some(task),
    })
}

impl NodeHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn context(&self) -> &Arc<ProcessContext> {
        &self.ctx
    }

    /// Wait for the causal task to reach DONE. The server keeps running.
    pub async fn wait_task(&mut self) -> anyhow::Result<TaskReport> {
        let task = self
            .task
            .take()
            .context("Causal task already awaited")?;
        task.await.context("Causal task panicked")
    }

    /// Wait for the server to stop. It only stops on an I/O error or abort.
    pub async fn wait_server(&mut self) -> anyhow::Result<()> {
        let server = self.server.take().context("Server already awaited")?;
        server
            .await
            .context("Server task panicked")?
            .context("Server failed")
    }

    /// Stop serving. In-flight requests are dropped, not drained.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(server) = self.server.take() {
            server.abort();
        }
        info!(process = %self.ctx.id, clock = self.ctx.clock.current(), "Process stopped");
    }
}

impl Drop for NodeHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}
