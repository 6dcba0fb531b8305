//! TOML-backed cluster configuration.
//!
//! The file describes every process in the cluster; a process picks its own
//! entry by id at startup. Without a file the reference topology is used.

use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::topology::{LocalTask, ProcessId, ProcessSpec, ServiceKind, Topology};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(rename = "process")]
    pub processes: Vec<ProcessConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            message_timeout_ms: default_message_timeout_ms(),
            ready_timeout_ms: default_ready_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessConfig {
    pub id: ProcessId,
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    pub service: ServiceKind,
    pub task: LocalTask,
    pub notify: Option<ProcessId>,
    pub awaits: Option<ProcessId>,
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
    #[serde(default)]
    pub start_delay_ms: u64,
}

fn default_message_timeout_ms() -> u64 {
    Topology::DEFAULT_MESSAGE_TIMEOUT.as_millis() as u64
}

fn default_ready_timeout_ms() -> u64 {
    Topology::DEFAULT_READY_TIMEOUT.as_millis() as u64
}

fn default_wait_timeout_ms() -> u64 {
    Topology::DEFAULT_WAIT_TIMEOUT.as_millis() as u64
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl FileConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse cluster config")
    }

    pub fn into_topology(self) -> Result<Topology> {
        let processes = self
            .processes
            .into_iter()
            .map(|p| ProcessSpec {
                id: p.id,
                host: p.host,
                port: p.port,
                service: p.service,
                task: p.task,
                notify: p.notify,
                awaits: p.awaits,
                wait_timeout: Duration::from_millis(p.wait_timeout_ms),
                start_delay: Duration::from_millis(p.start_delay_ms),
            })
            .collect();

        let topology = Topology::new(
            processes,
            Duration::from_millis(self.cluster.message_timeout_ms),
            Duration::from_millis(self.cluster.ready_timeout_ms),
        )
        .context("Invalid cluster topology")?;
        Ok(topology)
    }
}

/// Load and parse a TOML cluster config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Build the topology from `path`, or the reference topology when `None`,
/// then apply `LAMPORT_PEER_HOST_<ID>` host overrides from the environment.
pub fn load_topology(path: Option<&Path>) -> Result<Topology> {
    let mut topology = match path {
        Some(path) => load_config(path)?.into_topology()?,
        None => Topology::reference(),
    };
    apply_host_overrides(&mut topology, |key| env::var(key).ok());
    topology.validate().context("Invalid topology after host overrides")?;
    Ok(topology)
}

/// Environment variable naming the host override for a process id.
pub fn host_override_var(id: &ProcessId) -> String {
    let suffix: String = id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("LAMPORT_PEER_HOST_{suffix}")
}

fn apply_host_overrides(topology: &mut Topology, lookup: impl Fn(&str) -> Option<String>) {
    let ids: Vec<ProcessId> = topology.processes().iter().map(|p| p.id.clone()).collect();
    for id in ids {
        if let Some(host) = lookup(&host_override_var(&id)) {
            if let Some(process) = topology.process_mut(&id) {
                tracing::debug!(process = %id, host = %host, "Peer host override");
                process.host = host;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const THREE_NODE: &str = r#"
        [cluster]
        message_timeout_ms = 750

        [[process]]
        id = "A"
        port = 7001
        service = "math"
        task = { kind = "math-suite", a = 2.0, b = 4.0 }
        notify = "B"

        [[process]]
        id = "B"
        host = "node-b"
        port = 7002
        service = "sort"
        task = { kind = "quicksort", count = 10, max = 9 }
        notify = "C"
        awaits = "A"
        wait_timeout_ms = 1500

        [[process]]
        id = "C"
        port = 7003
        service = "search"
        task = { kind = "matrix-product" }
        awaits = "B"
        start_delay_ms = 200
    "#;

    #[test]
    fn parses_processes_and_defaults() {
        let topology = FileConfig::from_toml_str(THREE_NODE)
            .unwrap()
            .into_topology()
            .unwrap();

        assert_eq!(topology.message_timeout(), Duration::from_millis(750));
        assert_eq!(topology.ready_timeout(), Topology::DEFAULT_READY_TIMEOUT);

        let a = topology.process(&ProcessId::from("A")).unwrap();
        assert_eq!(a.address(), "127.0.0.1:7001");
        assert_eq!(a.task, LocalTask::MathSuite { a: 2.0, b: 4.0 });
        assert_eq!(a.wait_timeout, Topology::DEFAULT_WAIT_TIMEOUT);

        let b = topology.process(&ProcessId::from("B")).unwrap();
        assert_eq!(b.address(), "node-b:7002");
        assert_eq!(b.service, ServiceKind::Sort);
        assert_eq!(b.awaits, Some(ProcessId::from("A")));
        assert_eq!(b.wait_timeout, Duration::from_millis(1500));

        let c = topology.process(&ProcessId::from("C")).unwrap();
        assert_eq!(c.task, LocalTask::MatrixProduct);
        assert!(c.notify.is_none());
        assert_eq!(c.start_delay, Duration::from_millis(200));
    }

    #[test]
    fn rejects_unknown_fields() {
        let bad = THREE_NODE.replace("message_timeout_ms", "message_timeout_secs");
        assert!(FileConfig::from_toml_str(&bad).is_err());
    }

    #[test]
    fn rejects_invalid_topology() {
        let bad = THREE_NODE.replace("notify = \"C\"", "notify = \"Z\"");
        let err = FileConfig::from_toml_str(&bad)
            .unwrap()
            .into_topology()
            .unwrap_err();
        assert!(format!("{err:#}").contains("unknown process Z"), "{err:#}");
    }

    #[test]
    fn loads_from_file_with_path_in_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(THREE_NODE.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.processes.len(), 3);

        let missing = file.path().with_extension("missing");
        let err = load_config(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn host_override_variable_names() {
        assert_eq!(host_override_var(&ProcessId::from("P3")), "LAMPORT_PEER_HOST_P3");
        assert_eq!(
            host_override_var(&ProcessId::from("p3-matrix")),
            "LAMPORT_PEER_HOST_P3_MATRIX"
        );
    }

    #[test]
    fn applies_host_overrides() {
        let mut topology = Topology::reference();
        let env: HashMap<String, String> =
            HashMap::from([("LAMPORT_PEER_HOST_P3".to_string(), "node3".to_string())]);
        apply_host_overrides(&mut topology, |key| env.get(key).cloned());

        let p3 = topology.process(&ProcessId::from("P3")).unwrap();
        assert_eq!(p3.address(), "node3:50053");
        let p1 = topology.process(&ProcessId::from("P1")).unwrap();
        assert_eq!(p1.host, "127.0.0.1");
    }

    #[test]
    fn empty_sampling_range_fails_at_load() {
        let bad = THREE_NODE.replace("max = 9", "max = -1");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bad.as_bytes()).unwrap();

        let err = load_topology(Some(file.path())).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid cluster topology"), "{message}");
        assert!(message.contains("B has an invalid task"), "{message}");
    }
}
