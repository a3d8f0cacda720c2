// ── Station lifecycle ──
//
// One logical task per configured device: a single background poll loop,
// serialized (no overlapping fetches), publishing full payload
// replacements through a watch channel. A failed cycle leaves the
// last-known-good snapshot in place; how stale values are presented is
// the consumer's policy, not ours.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use weatherduino_api::{StationClient, TransportConfig};

use crate::classify::{DeviceKind, classify};
use crate::config::StationConfig;
use crate::entity::{DeviceInfo, SensorEntity, build_entities};
use crate::error::CoreError;
use crate::payload::Payload;

// ── PollState ────────────────────────────────────────────────────────

/// Poll loop state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Not started, or stopped.
    Idle,
    /// Last cycle succeeded.
    Running,
    /// One or more cycles failed since the last success. Values are
    /// frozen at the previous snapshot until a cycle succeeds again.
    Failing { consecutive_errors: u32 },
}

// ── Snapshot ─────────────────────────────────────────────────────────

/// The result of one successful poll cycle.
#[derive(Debug, Clone)]
pub struct StationSnapshot {
    /// Full payload replacement -- never merged with the previous one.
    pub payload: Arc<Payload>,
    /// Display identity (payload `ID` or the configured host).
    pub device_id: String,
    /// Classified per poll, unless a forced kind is configured.
    pub kind: DeviceKind,
    pub fetched_at: DateTime<Utc>,
}

// ── Station ──────────────────────────────────────────────────────────

/// Handle for one polled device. Cheaply cloneable via `Arc`.
///
/// [`start()`](Self::start) performs the first fetch, fixes the entity
/// set from that snapshot, and spawns the background poll loop. Entities
/// are never recreated afterwards -- fields that appear only in later
/// payloads require a full restart to surface.
#[derive(Clone)]
pub struct Station {
    inner: Arc<StationInner>,
}

struct StationInner {
    config: StationConfig,
    entry_id: String,
    client: StationClient,
    snapshot: watch::Sender<Option<StationSnapshot>>,
    state: watch::Sender<PollState>,
    entities: OnceLock<Arc<Vec<SensorEntity>>>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Station {
    /// Create a station from configuration. Does NOT poll -- call
    /// [`start()`](Self::start) to fetch and begin the loop.
    pub fn new(config: StationConfig) -> Result<Self, CoreError> {
        let endpoint = config.endpoint_url().map_err(|e| CoreError::Config {
            message: format!("invalid endpoint URL: {e}"),
        })?;

        let transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = StationClient::new(endpoint, config.host.clone(), &transport)
            .map_err(|e| CoreError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        let entry_id = config.unique_id();
        let (snapshot, _) = watch::channel(None);
        let (state, _) = watch::channel(PollState::Idle);

        Ok(Self {
            inner: Arc::new(StationInner {
                config,
                entry_id,
                client,
                snapshot,
                state,
                entities: OnceLock::new(),
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &StationConfig {
        &self.inner.config
    }

    /// The stable configuration-entry identifier.
    pub fn entry_id(&self) -> &str {
        &self.inner.entry_id
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// First fetch + entity setup, then spawn the poll loop.
    ///
    /// A failed first fetch aborts the start; nothing is spawned and the
    /// caller may simply try again later.
    pub async fn start(&self) -> Result<(), CoreError> {
        let snap = self.refresh().await?;

        let entities = build_entities(&self.inner.entry_id, snap.kind, &snap.payload);
        if entities.is_empty() {
            // Unknown shape (or a forced kind whose keys are absent).
            // Silently stable: zero sensors, polling continues.
            info!(kind = %snap.kind, device = %snap.device_id, "payload exposes no sensors");
        } else {
            debug!(
                kind = %snap.kind,
                sensors = entities.len(),
                device = %snap.device_id,
                "entity set fixed from first snapshot"
            );
        }
        let _ = self.inner.entities.set(Arc::new(entities));
        let _ = self.inner.state.send(PollState::Running);

        let station = self.clone();
        let cancel = self.inner.cancel.clone();
        *self.inner.task.lock().await = Some(tokio::spawn(poll_task(station, cancel)));

        Ok(())
    }

    /// Cancel the poll loop and join it. An in-flight fetch is abandoned
    /// and its result discarded.
    pub async fn stop(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.task.lock().await.take() {
            let _ = handle.await;
        }
        let _ = self.inner.state.send(PollState::Idle);
        debug!(station = %self.inner.entry_id, "stopped");
    }

    /// One poll cycle: fetch, classify, publish a full replacement.
    pub async fn refresh(&self) -> Result<StationSnapshot, CoreError> {
        let raw = self.inner.client.fetch().await?;
        let device_id = self.inner.client.device_id(&raw);
        let payload = Arc::new(Payload::new(raw));

        let kind = match self.inner.config.forced_kind {
            Some(kind) => kind,
            None => classify(&payload),
        };

        let snap = StationSnapshot {
            payload,
            device_id,
            kind,
            fetched_at: Utc::now(),
        };
        self.inner.snapshot.send_replace(Some(snap.clone()));
        Ok(snap)
    }

    // ── Observation ──────────────────────────────────────────────

    /// The fixed entity set. Errors until [`start()`](Self::start) has
    /// completed its first fetch.
    pub fn entities(&self) -> Result<Arc<Vec<SensorEntity>>, CoreError> {
        self.inner
            .entities
            .get()
            .cloned()
            .ok_or(CoreError::NotStarted)
    }

    /// Subscribe to payload snapshots.
    pub fn snapshots(&self) -> watch::Receiver<Option<StationSnapshot>> {
        self.inner.snapshot.subscribe()
    }

    /// The most recent snapshot, if any poll has succeeded.
    pub fn latest(&self) -> Option<StationSnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to poll-state changes.
    pub fn state(&self) -> watch::Receiver<PollState> {
        self.inner.state.subscribe()
    }

    /// Device-registry record derived from the latest snapshot.
    pub fn device_info(&self) -> Result<DeviceInfo, CoreError> {
        let snap = self.latest().ok_or(CoreError::NotStarted)?;
        Ok(DeviceInfo::new(
            &self.inner.entry_id,
            &snap.device_id,
            snap.kind,
            &self.inner.config.base_url(),
        ))
    }
}

// ── Background task ──────────────────────────────────────────────────

/// Poll on the configured interval until cancelled.
///
/// Failures are logged and counted; the loop never exits on error --
/// recovery is automatic on the next successful cycle.
async fn poll_task(station: Station, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(station.inner.config.scan_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    let mut consecutive_errors: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Cancellation during the fetch abandons it; the result,
                // if it ever arrives, is dropped with the future.
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    result = station.refresh() => match result {
                        Ok(_) => {
                            if consecutive_errors > 0 {
                                info!(station = %station.inner.entry_id, "poll recovered");
                            }
                            consecutive_errors = 0;
                            let _ = station.inner.state.send(PollState::Running);
                        }
                        Err(e) => {
                            consecutive_errors += 1;
                            warn!(
                                error = %e,
                                consecutive_errors,
                                "poll failed -- values frozen at last known good"
                            );
                            let _ = station
                                .inner
                                .state
                                .send(PollState::Failing { consecutive_errors });
                        }
                    },
                }
            }
        }
    }
}
