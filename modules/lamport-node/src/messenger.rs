//! Peer messenger: one-way notifications to another process's inbox.
//!
//! Delivery is a single attempt bounded by the cluster message timeout.
//! There is no retry; callers treat a failure as a causality gap.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use lamport_common::{MessageRequest, MessageResponse, ProcessId, ProcessSpec};

#[derive(Debug, Error)]
pub enum MessengerError {
    #[error("no reply from {peer} within {after:?}")]
    Timeout { peer: ProcessId, after: Duration },

    #[error("{peer} unreachable: {reason}")]
    Unreachable { peer: ProcessId, reason: String },

    #[error("{peer} rejected the request: {reason}")]
    Rejected { peer: ProcessId, reason: String },

    #[error("transport error talking to {peer}: {reason}")]
    Transport { peer: ProcessId, reason: String },
}

impl MessengerError {
    pub(crate) fn from_reqwest(peer: &ProcessId, after: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MessengerError::Timeout {
                peer: peer.clone(),
                after,
            }
        } else if err.is_connect() {
            MessengerError::Unreachable {
                peer: peer.clone(),
                reason: err.to_string(),
            }
        } else {
            MessengerError::Transport {
                peer: peer.clone(),
                reason: err.to_string(),
            }
        }
    }

    pub fn peer(&self) -> &ProcessId {
        match self {
            MessengerError::Timeout { peer, .. }
            | MessengerError::Unreachable { peer, .. }
            | MessengerError::Rejected { peer, .. }
            | MessengerError::Transport { peer, .. } => peer,
        }
    }
}

/// Client side of the inbox protocol.
#[async_trait]
pub trait PeerMessenger: Send + Sync {
    /// Deliver `message` to `peer`'s inbox and return its acknowledgement.
    async fn send_message(
        &self,
        peer: &ProcessSpec,
        message: &MessageRequest,
    ) -> Result<MessageResponse, MessengerError>;

    /// Whether `peer` is accepting requests right now.
    async fn is_ready(&self, peer: &ProcessSpec) -> bool;
}

/// Send `payload` from `sender` to `peer` stamped with `timestamp` (the
/// sender's post-tick clock). Returns the receiver's acknowledged clock.
pub async fn notify(
    messenger: &dyn PeerMessenger,
    sender: &ProcessId,
    peer: &ProcessSpec,
    payload: &str,
    timestamp: u64,
) -> Result<u64, MessengerError> {
    let request = MessageRequest {
        sender_id: sender.clone(),
        receiver_id: peer.id.clone(),
        message: payload.to_string(),
        timestamp,
    };

    let response = messenger.send_message(peer, &request).await?;
    if !response.is_ack() {
        return Err(MessengerError::Rejected {
            peer: peer.id.clone(),
            reason: format!("unexpected status {:?}", response.status),
        });
    }
    Ok(response.timestamp)
}

// ---------------------------------------------------------------------------
// HttpMessenger
// ---------------------------------------------------------------------------

/// JSON-over-HTTP messenger used between live processes.
#[derive(Clone)]
pub struct HttpMessenger {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpMessenger {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl PeerMessenger for HttpMessenger {
    async fn send_message(
        &self,
        peer: &ProcessSpec,
        message: &MessageRequest,
    ) -> Result<MessageResponse, MessengerError> {
        let endpoint = format!("{}/message", peer.base_url());
        let resp = self
            .client
            .post(&endpoint)
            .json(message)
            .send()
            .await
            .map_err(|e| MessengerError::from_reqwest(&peer.id, self.timeout, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MessengerError::Rejected {
                peer: peer.id.clone(),
                reason: format!("HTTP {}: {body}", status.as_u16()),
            });
        }

        resp.json::<MessageResponse>()
            .await
            .map_err(|e| MessengerError::from_reqwest(&peer.id, self.timeout, e))
    }

    async fn is_ready(&self, peer: &ProcessSpec) -> bool {
        let endpoint = format!("{}/health", peer.base_url());
        match self.client.get(&endpoint).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                tracing::trace!(peer = %peer.id, error = %err, "Peer not ready");
                false
            }
        }
    }
}
