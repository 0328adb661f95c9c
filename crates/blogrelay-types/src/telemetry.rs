//! Telemetry snapshot types consumed by the status dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked client of a transport adapter.
///
/// Created on the first request from a client identity, updated on every
/// subsequent request, evicted once idle past the sink's threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConnection {
    /// Transport-provided identity (socket port, or "stdio")
    pub id: String,
    /// Source address, when the transport knows one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// When the client was first seen
    pub connected_at: DateTime<Utc>,
    /// When the client last issued a request
    pub last_activity: DateTime<Utc>,
    /// Requests issued by this client
    pub request_count: u64,
}

/// Accumulated usage counters for the process lifetime.
///
/// `average_response_time` is derived: total successful latency divided by
/// `successful_requests`, in whole milliseconds, 0 when nothing succeeded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    /// Dispatch attempts recorded (post-validation only)
    pub total_requests: u64,
    /// Dispatches whose handler returned a payload
    pub successful_requests: u64,
    /// Dispatches whose handler failed
    pub failed_requests: u64,
    /// Mean handler latency over successful dispatches, milliseconds
    pub average_response_time: u64,
    /// Per-tool dispatch counts; keys are exactly the registered tool names
    pub tool_usage: BTreeMap<String, u64>,
}

/// Coarse server state pushed to the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    /// Whether the transport loop is running
    pub running: bool,
    /// Active transport mode ("stdio" or "http")
    pub mode: String,
    /// Process start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Currently tracked client connections
    pub connections: usize,
    /// Registered tool names
    pub tools: Vec<String>,
}

/// Event pushed to dashboard subscribers on every telemetry mutation.
///
/// Framed on the wire as `{"event": <name>, "data": <payload>}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum DashboardEvent {
    /// Server status changed
    Status(ServerStatus),
    /// Connection set changed
    Connections(Vec<ClientConnection>),
    /// Usage counters changed
    Stats(ServerStats),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dashboard_event_frames_with_event_and_data() {
        let event = DashboardEvent::Stats(ServerStats::default());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "stats");
        assert_eq!(value["data"]["totalRequests"], 0);
        assert!(value["data"]["toolUsage"].is_object());
    }

    #[test]
    fn connection_serializes_camel_case() {
        let now = Utc::now();
        let conn = ClientConnection {
            id: "54321".into(),
            ip: Some("127.0.0.1".into()),
            connected_at: now,
            last_activity: now,
            request_count: 3,
        };
        let value = serde_json::to_value(&conn).unwrap();
        assert!(value.get("connectedAt").is_some());
        assert!(value.get("lastActivity").is_some());
        assert_eq!(value["requestCount"], 3);
    }
}
