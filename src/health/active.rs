//! Active health checking.
//!
//! # Responsibilities
//! - Probe the API health endpoint with a hard timeout
//! - Publish the result through a watch channel
//! - Run probes on a fixed schedule and on demand

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::{Client, Url};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::{HealthConfig, ProbeOverlap};
use crate::health::state::{HealthState, HealthStatus};
use crate::observability::metrics;

/// Default schedule for `HealthMonitor::start`.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Default ceiling for a single probe.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Errors raised while building a monitor. Probing itself never fails.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("invalid health endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Keeps a best-effort view of whether the API is reachable.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct HealthMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    overlap: ProbeOverlap,
    state: watch::Sender<HealthState>,
    in_flight: AtomicUsize,
    // 0 = none yet, 1 = healthy, 2 = down
    last_outcome: AtomicU8,
}

impl HealthMonitor {
    /// Create a monitor for the endpoint in `config`.
    pub fn new(config: &HealthConfig) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .user_agent("rag-console-health-check")
            .build()?;
        Self::with_client(client, config)
    }

    /// Create a monitor that sends probes through an existing client.
    pub fn with_client(client: Client, config: &HealthConfig) -> Result<Self, MonitorError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let (state, _) = watch::channel(HealthState::default());

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                endpoint,
                timeout: config.timeout(),
                overlap: config.overlap,
                state,
                in_flight: AtomicUsize::new(0),
                last_outcome: AtomicU8::new(0),
            }),
        })
    }

    /// URL every probe is sent to.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> HealthState {
        *self.inner.state.borrow()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.inner.state.subscribe()
    }

    /// Run one probe and return the state it left behind.
    ///
    /// Never fails: timeouts, network errors and non-2xx responses all
    /// end in `Down`. With `ProbeOverlap::Skip`, a call made while another
    /// probe is running returns the current state without probing.
    ///
    /// # Cancel safety
    ///
    /// Dropping the future before it completes settles the state as `Down`
    /// with a fresh `last_checked`, so the monitor never stays in `Checking`.
    pub async fn probe(&self) -> HealthState {
        let Some(_guard) = self.inner.enter() else {
            tracing::debug!("Health probe already in flight, skipping");
            return self.current();
        };

        let pending = PendingCheck::begin(&self.inner);

        let started = Instant::now();
        let healthy = self.inner.check().await;
        metrics::record_probe(healthy, started.elapsed());

        pending.finish(healthy)
    }

    /// Probe now, then every `every` until the handle is stopped or dropped.
    ///
    /// Each tick spawns its probe as a separate task, so stopping the
    /// schedule never cuts a probe short.
    pub fn start(&self, every: Duration) -> PollHandle {
        let monitor = self.clone();
        let every = every.max(Duration::from_millis(1));

        tracing::info!(
            endpoint = %self.inner.endpoint,
            interval_ms = every.as_millis() as u64,
            timeout_ms = self.inner.timeout.as_millis() as u64,
            "Health monitor starting"
        );

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let monitor = monitor.clone();
                tokio::spawn(async move {
                    monitor.probe().await;
                });
            }
        });

        PollHandle {
            task,
            stopped: AtomicBool::new(false),
        }
    }

    /// Probe immediately, outside the schedule.
    pub fn refresh_now(&self) -> JoinHandle<HealthState> {
        let monitor = self.clone();
        tokio::spawn(async move { monitor.probe().await })
    }

    /// Number of probes currently running.
    pub fn probes_in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Relaxed)
    }
}

impl Inner {
    fn enter(&self) -> Option<InFlightGuard<'_>> {
        match self.overlap {
            ProbeOverlap::Concurrent => {
                self.in_flight.fetch_add(1, Ordering::AcqRel);
            }
            ProbeOverlap::Skip => {
                self.in_flight
                    .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
                    .ok()?;
            }
        }
        Some(InFlightGuard { counter: &self.in_flight })
    }

    async fn check(&self) -> bool {
        let request = self.client.get(self.endpoint.clone()).send();

        match time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => response.status().is_success(),
            Ok(Err(e)) if is_unreachable(&e) => {
                tracing::trace!(error = %e, "Health probe: API unreachable");
                false
            }
            Ok(Err(e)) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Health check error");
                false
            }
            // Dropping the send future cancels the request.
            Err(_) => {
                tracing::trace!("Health probe: timed out");
                false
            }
        }
    }

    /// Write the result and its side effects under the channel lock, so
    /// the gauge and the "changed" log follow the same order as the state.
    fn settle(&self, healthy: bool) -> HealthState {
        let mut snapshot = HealthState::default();
        self.state.send_modify(|state| {
            state.complete_probe(healthy, Utc::now());
            snapshot = *state;
            self.note_outcome(snapshot.status);
        });
        snapshot
    }

    fn note_outcome(&self, status: HealthStatus) {
        let code = match status {
            HealthStatus::Healthy => 1,
            HealthStatus::Down => 2,
            HealthStatus::Checking => return,
        };
        metrics::set_api_health(status == HealthStatus::Healthy);

        let previous = self.last_outcome.swap(code, Ordering::AcqRel);
        if previous != code {
            tracing::info!(endpoint = %self.endpoint, status = %status, "API health changed");
        }
    }
}

/// Connection refused, DNS failure, reset, or a client-side timeout.
fn is_unreachable(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout() || e.is_request()
}

/// Counts a running probe for as long as it lives.
struct InFlightGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A started check whose result has not been written yet.
///
/// If dropped before `finish`, the check counts as failed.
struct PendingCheck<'a> {
    inner: &'a Inner,
    done: bool,
}

impl<'a> PendingCheck<'a> {
    fn begin(inner: &'a Inner) -> Self {
        inner.state.send_modify(HealthState::begin_probe);
        Self { inner, done: false }
    }

    fn finish(mut self, healthy: bool) -> HealthState {
        self.done = true;
        self.inner.settle(healthy)
    }
}

impl Drop for PendingCheck<'_> {
    fn drop(&mut self) {
        if !self.done {
            tracing::debug!("Health check cancelled before completion");
            self.inner.settle(false);
        }
    }
}

/// Handle to a running probe schedule.
///
/// Stopping releases the timer; dropping the handle stops it too.
pub struct PollHandle {
    task: JoinHandle<()>,
    stopped: AtomicBool,
}

impl PollHandle {
    /// Cancel the schedule. Safe to call any number of times.
    pub fn stop(&self) {
        self.task.abort();
        if !self.stopped.swap(true, Ordering::AcqRel) {
            tracing::info!("Health monitor stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
