//! Usage telemetry sink.
//!
//! A single owned instance accumulates per-tool counters and per-client
//! connection records, and pushes fresh snapshots to dashboard subscribers
//! on every mutation. All state sits behind one mutex; locks are short and
//! never held across an await point. Only post-validation dispatch attempts
//! are recorded - validation rejections and unknown-tool lookups change no
//! counters.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use blogrelay_types::{ClientConnection, DashboardEvent, ServerStats, ServerStatus};

/// Connections idle longer than this are purged on the next sweep.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Capacity of the dashboard event channel. Slow subscribers lag and
/// re-sync from snapshots rather than blocking the request path.
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
struct SinkState {
    stats: ServerStats,
    // Running total of successful-dispatch latency; average_response_time
    // is derived from it on every update
    total_response_time_ms: u64,
    connections: HashMap<String, ClientConnection>,
    status: ServerStatus,
}

/// In-memory counters and connection records surfaced to the dashboard.
#[derive(Debug)]
pub struct TelemetrySink {
    state: Mutex<SinkState>,
    events: broadcast::Sender<DashboardEvent>,
}

impl TelemetrySink {
    /// Create a sink for the given transport mode and registered tool set.
    ///
    /// `tool_usage` keys are exactly the registered tool names, each
    /// starting at zero.
    #[must_use]
    pub fn new(mode: &str, tool_names: &[String]) -> Self {
        let stats = ServerStats {
            tool_usage: tool_names.iter().map(|name| (name.clone(), 0)).collect(),
            ..Default::default()
        };
        let status = ServerStatus {
            running: true,
            mode: mode.to_string(),
            start_time: Some(Utc::now()),
            connections: 0,
            tools: tool_names.to_vec(),
        };
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(SinkState {
                stats,
                total_response_time_ms: 0,
                connections: HashMap::new(),
                status,
            }),
            events,
        }
    }

    /// Subscribe to snapshot events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Record the outcome of one dispatched tool call.
    pub fn record_dispatch(&self, tool: &str, success: bool, latency: Duration) {
        let event = {
            let mut state = self.state.lock();
            state.stats.total_requests += 1;
            if success {
                state.stats.successful_requests += 1;
                state.total_response_time_ms += latency.as_millis() as u64;
            } else {
                state.stats.failed_requests += 1;
            }
            if let Some(count) = state.stats.tool_usage.get_mut(tool) {
                *count += 1;
            }
            state.stats.average_response_time = if state.stats.successful_requests > 0 {
                state.total_response_time_ms / state.stats.successful_requests
            } else {
                0
            };
            DashboardEvent::Stats(state.stats.clone())
        };
        self.broadcast(event);
    }

    /// Note activity from a client identity, creating its record on first
    /// sight, then sweep records idle past [`IDLE_TIMEOUT`].
    pub fn touch_client(&self, id: &str, ip: Option<&str>) {
        let now = Utc::now();
        let (connections, status) = {
            let mut state = self.state.lock();
            state
                .connections
                .entry(id.to_string())
                .and_modify(|conn| {
                    conn.last_activity = now;
                    conn.request_count += 1;
                })
                .or_insert_with(|| ClientConnection {
                    id: id.to_string(),
                    ip: ip.map(ToString::to_string),
                    connected_at: now,
                    last_activity: now,
                    request_count: 1,
                });
            Self::sweep(&mut state, now);
            state.status.connections = state.connections.len();
            (
                DashboardEvent::Connections(Self::sorted_connections(&state)),
                DashboardEvent::Status(state.status.clone()),
            )
        };
        self.broadcast(connections);
        self.broadcast(status);
    }

    /// Drop a tracked client record. Returns whether it existed.
    pub fn evict_client(&self, id: &str) -> bool {
        let (existed, events) = {
            let mut state = self.state.lock();
            let existed = state.connections.remove(id).is_some();
            state.status.connections = state.connections.len();
            (
                existed,
                (
                    DashboardEvent::Connections(Self::sorted_connections(&state)),
                    DashboardEvent::Status(state.status.clone()),
                ),
            )
        };
        if existed {
            debug!(client = %id, "connection record evicted");
            self.broadcast(events.0);
            self.broadcast(events.1);
        }
        existed
    }

    /// Current usage counters.
    #[must_use]
    pub fn stats(&self) -> ServerStats {
        self.state.lock().stats.clone()
    }

    /// Current connection records, oldest first.
    #[must_use]
    pub fn connections(&self) -> Vec<ClientConnection> {
        Self::sorted_connections(&self.state.lock())
    }

    /// Current server status.
    #[must_use]
    pub fn status(&self) -> ServerStatus {
        self.state.lock().status.clone()
    }

    /// The three current snapshots, in the order they are replayed to a
    /// freshly connected dashboard subscriber.
    #[must_use]
    pub fn snapshot_events(&self) -> [DashboardEvent; 3] {
        let state = self.state.lock();
        [
            DashboardEvent::Status(state.status.clone()),
            DashboardEvent::Connections(Self::sorted_connections(&state)),
            DashboardEvent::Stats(state.stats.clone()),
        ]
    }

    fn sweep(state: &mut SinkState, now: DateTime<Utc>) {
        let cutoff = now - IDLE_TIMEOUT;
        state.connections.retain(|_, conn| conn.last_activity >= cutoff);
    }

    fn sorted_connections(state: &SinkState) -> Vec<ClientConnection> {
        let mut connections: Vec<_> = state.connections.values().cloned().collect();
        connections.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        connections
    }

    fn broadcast(&self, event: DashboardEvent) {
        // Err means no dashboard is listening; telemetry still accumulates
        let _ = self.events.send(event);
    }
}
