use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::auction::protocol::{ResponseStatus, UpdateResponse, ENDPOINT_UPDATE};
use crate::auction::state::StateSnapshot;

/// Timeout on connection establishment to the backup. There is no timeout on
/// the update call itself.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(3);

/// The capability the auction core depends on: hand off a snapshot for
/// delivery to the peer. Implementations must not block the caller.
pub trait ReplicationSink: Send + Sync {
    fn push(&self, snapshot: StateSnapshot);
}

/// Production sink: enqueues snapshots into the bounded worker queue.
///
/// A full queue drops the snapshot. That is acceptable here because every
/// snapshot carries the whole state, so the next successful push supersedes
/// anything dropped before it.
pub struct QueuedReplicator {
    tx: mpsc::Sender<StateSnapshot>,
}

impl ReplicationSink for QueuedReplicator {
    fn push(&self, snapshot: StateSnapshot) {
        if let Err(e) = self.tx.try_send(snapshot) {
            tracing::warn!("Dropping replication push: {}", e);
        }
    }
}

/// Drains the queue and delivers snapshots to the peer's update endpoint.
///
/// `connected` is a cached connectivity flag used only for logging the
/// lost/restored transitions; reconnection itself is implicit in the next
/// POST attempt.
pub struct ReplicationWorker {
    rx: mpsc::Receiver<StateSnapshot>,
    peer_url: String,
    http_client: reqwest::Client,
    connected: bool,
}

/// Builds the sink/worker pair for a node. `peer_url` is the base URL of the
/// other node, e.g. `http://127.0.0.1:3001`.
pub fn channel(peer_url: String, capacity: usize) -> Result<(QueuedReplicator, ReplicationWorker)> {
    let (tx, rx) = mpsc::channel(capacity);
    let http_client = reqwest::Client::builder()
        .connect_timeout(DIAL_TIMEOUT)
        .build()?;

    Ok((
        QueuedReplicator { tx },
        ReplicationWorker {
            rx,
            peer_url: peer_url.trim_end_matches('/').to_string(),
            http_client,
            connected: false,
        },
    ))
}

impl ReplicationWorker {
    /// Runs until every sink handle is dropped.
    pub async fn run(mut self) {
        while let Some(snapshot) = self.rx.recv().await {
            self.push_snapshot(snapshot).await;
        }
        tracing::debug!("Replication queue closed, worker exiting");
    }

    async fn push_snapshot(&mut self, snapshot: StateSnapshot) {
        let url = format!("{}{}", self.peer_url, ENDPOINT_UPDATE);

        let accepted = match self.http_client.post(&url).json(&snapshot).send().await {
            Ok(response) => match response.json::<UpdateResponse>().await {
                Ok(ack) => ack.status == ResponseStatus::Accepted,
                Err(e) => {
                    tracing::warn!("Unreadable update ack from backup: {}", e);
                    false
                }
            },
            Err(e) => {
                if self.connected {
                    tracing::warn!("Connection to backup is lost: {}", e);
                } else {
                    tracing::debug!("Backup at {} unreachable: {}", self.peer_url, e);
                }
                self.connected = false;
                return;
            }
        };

        if accepted {
            if !self.connected {
                tracing::info!("Replicating to backup at {}", self.peer_url);
            }
            self.connected = true;
        } else {
            tracing::warn!("Backup at {} refused the state update", self.peer_url);
            self.connected = false;
        }
    }
}

/// Records pushes synchronously instead of delivering them. Lets the auction
/// core be tested without a peer node.
#[cfg(test)]
pub(crate) struct RecordingSink {
    pub pushes: std::sync::Mutex<Vec<StateSnapshot>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self {
            pushes: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn recorded(&self) -> Vec<StateSnapshot> {
        self.pushes.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ReplicationSink for RecordingSink {
    fn push(&self, snapshot: StateSnapshot) {
        self.pushes.lock().unwrap().push(snapshot);
    }
}
