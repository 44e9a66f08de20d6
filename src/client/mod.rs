pub mod rpc;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Hard deadline per request. The HTTP client tears the connection down when
/// it passes, so a stalled response can never reach the merge path late.
pub const FETCH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default cadence of the snapshot poll.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

const STOP_CHECK_SLICE: Duration = Duration::from_millis(100);

/// Role classification of a topology node. Unknown wire values land on
/// [`NodeKind::Other`] and render with the fallback color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Orchestrator,
    Contract,
    Trainer,
    Validator,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeInput {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub status: Option<String>,
}

/// One interaction edge. Replaced wholesale every snapshot, so there is no
/// separate stored record type; repeated interactions arrive collapsed with a
/// `count` greater than one.
#[derive(Clone, Debug, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(default = "default_edge_count")]
    pub count: u32,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_edge_count() -> u32 {
    1
}

/// Progress counters of the training job. Opaque scalars, last write wins.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobState {
    pub current_epoch: u64,
    pub total_epochs: u64,
    pub updates_submitted: u64,
    pub validations_completed: u64,
    pub aggregations_done: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SnapshotPayload {
    #[serde(default)]
    pub nodes: Vec<NodeInput>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub job_state: Option<JobState>,
}

/// What a poll cycle produced. A failed cycle only flips the link indicator;
/// the previously merged graph stays on screen.
pub enum PollUpdate {
    Snapshot(SnapshotPayload),
    Disconnected,
}

pub struct SnapshotClient {
    http: reqwest::blocking::Client,
    graph_url: String,
}

impl SnapshotClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            graph_url: graph_url(endpoint),
        })
    }

    /// Timeout, connection error, non-2xx, and malformed JSON all surface as
    /// one transient failure; the caller retries on the next cycle.
    pub fn fetch_snapshot(&self) -> Result<SnapshotPayload> {
        let response = self
            .http
            .get(&self.graph_url)
            .send()
            .context("graph endpoint unreachable")?
            .error_for_status()
            .context("graph fetch failed")?;
        response.json().context("malformed graph payload")
    }
}

fn graph_url(endpoint: &str) -> String {
    format!("{}/graph", endpoint.trim_end_matches('/'))
}

/// Background polling thread delivering into an mpsc channel. The receiving
/// end is drained on the UI thread, which is the only place state is merged,
/// so the merge never runs concurrently with the simulation.
pub struct Poller<T> {
    rx: Receiver<T>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Poller<T> {
    /// Runs `cycle` once immediately, then on the fixed interval. No backoff:
    /// a failed cycle is absorbed by the next scheduled one.
    pub fn spawn(interval: Duration, mut cycle: impl FnMut() -> T + Send + 'static) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                if tx.send(cycle()).is_err() {
                    break;
                }

                let mut slept = Duration::ZERO;
                while slept < interval {
                    if stop_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    let slice = STOP_CHECK_SLICE.min(interval - slept);
                    thread::sleep(slice);
                    slept += slice;
                }
            }
        });

        Self {
            rx,
            stop,
            handle: Some(handle),
        }
    }

    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Cancels the polling loop and joins the thread.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn spawn_snapshot_poller(
    client: SnapshotClient,
    interval: Duration,
) -> Poller<PollUpdate> {
    Poller::spawn(interval, move || {
        match client.fetch_snapshot() {
            Ok(payload) => PollUpdate::Snapshot(payload),
            Err(error) => {
                tracing::warn!("snapshot fetch failed: {error:#}");
                PollUpdate::Disconnected
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_url_strips_trailing_slash() {
        assert_eq!(graph_url("http://localhost:8000"), "http://localhost:8000/graph");
        assert_eq!(graph_url("http://localhost:8000/"), "http://localhost:8000/graph");
    }

    #[test]
    fn unknown_node_kind_deserializes_to_other() {
        let input: NodeInput =
            serde_json::from_str(r#"{"id": "x1", "type": "aggregator"}"#).unwrap();
        assert_eq!(input.kind, NodeKind::Other);
        assert!(input.label.is_none());
    }

    #[test]
    fn edge_count_defaults_to_one() {
        let edge: EdgeRecord =
            serde_json::from_str(r#"{"source": "a", "target": "b"}"#).unwrap();
        assert_eq!(edge.count, 1);
    }

    #[test]
    fn payload_tolerates_missing_sections() {
        let payload: SnapshotPayload = serde_json::from_str(r#"{"nodes": []}"#).unwrap();
        assert!(payload.edges.is_empty());
        assert!(payload.job_state.is_none());
    }

    #[test]
    fn poller_shutdown_joins() {
        let mut poller = Poller::spawn(Duration::from_millis(10), || 1u32);
        assert_eq!(
            poller
                .rx
                .recv_timeout(Duration::from_millis(500))
                .expect("first cycle fires immediately"),
            1
        );
        poller.shutdown();
        assert!(poller.handle.is_none());
    }
}
