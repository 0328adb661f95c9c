//! Dashboard channel: snapshot endpoints plus a WebSocket push feed.
//!
//! The dashboard is a passive observer of the telemetry sink. REST routes
//! serve point-in-time snapshots; the WebSocket feed replays the current
//! snapshots on connect and then forwards every event the sink broadcasts.
//! Rendering lives entirely on the other side of this boundary.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use blogrelay_types::{DashboardEvent, RelayError, RelayResult};

use crate::telemetry::TelemetrySink;

/// Commands a dashboard may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
enum DashboardCommand {
    /// Re-send all current snapshots to this socket
    RefreshData,
    /// Drop one tracked client connection record
    #[serde(rename_all = "camelCase")]
    DisconnectClient {
        /// Identity of the record to drop
        client_id: String,
    },
    /// Restart request; acknowledged in the log only
    RestartServer,
}

/// Build the dashboard router. Exposed for in-process tests.
pub fn router(telemetry: Arc<TelemetrySink>) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/connections", get(get_connections))
        .route("/api/stats", get(get_stats))
        .route("/ws", get(ws_upgrade))
        .with_state(telemetry)
}

/// Bind and serve the dashboard channel.
///
/// # Errors
///
/// `RelayError::Transport` on bind or serve failure.
pub async fn run(port: u16, telemetry: Arc<TelemetrySink>) -> RelayResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::Transport(format!("failed to bind dashboard {addr}: {e}")))?;

    info!(%addr, "dashboard channel listening");

    axum::serve(listener, router(telemetry))
        .await
        .map_err(|e| RelayError::Transport(format!("dashboard server error: {e}")))
}

async fn get_status(State(telemetry): State<Arc<TelemetrySink>>) -> impl IntoResponse {
    Json(telemetry.status())
}

async fn get_connections(State(telemetry): State<Arc<TelemetrySink>>) -> impl IntoResponse {
    Json(telemetry.connections())
}

async fn get_stats(State(telemetry): State<Arc<TelemetrySink>>) -> impl IntoResponse {
    Json(telemetry.stats())
}

async fn ws_upgrade(
    State(telemetry): State<Arc<TelemetrySink>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_socket(socket, telemetry))
}

async fn serve_socket(mut socket: WebSocket, telemetry: Arc<TelemetrySink>) {
    let socket_id = Uuid::new_v4();
    info!(%socket_id, "dashboard client connected");

    let mut events = telemetry.subscribe();
    if replay_snapshots(&mut socket, &telemetry).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Slow consumer: resync from snapshots instead of
                    // replaying the backlog
                    warn!(%socket_id, skipped, "dashboard feed lagged; resyncing");
                    if replay_snapshots(&mut socket, &telemetry).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if handle_command(text.as_str(), &mut socket, &telemetry)
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(%socket_id, error = %e, "dashboard socket error");
                    break;
                }
            },
        }
    }

    info!(%socket_id, "dashboard client disconnected");
}

async fn replay_snapshots(socket: &mut WebSocket, telemetry: &TelemetrySink) -> Result<(), ()> {
    for event in telemetry.snapshot_events() {
        send_event(socket, &event).await?;
    }
    Ok(())
}

async fn send_event(socket: &mut WebSocket, event: &DashboardEvent) -> Result<(), ()> {
    let Ok(encoded) = serde_json::to_string(event) else {
        return Err(());
    };
    socket
        .send(Message::Text(encoded.into()))
        .await
        .map_err(|_| ())
}

async fn handle_command(
    text: &str,
    socket: &mut WebSocket,
    telemetry: &TelemetrySink,
) -> Result<(), ()> {
    match serde_json::from_str::<DashboardCommand>(text) {
        Ok(DashboardCommand::RefreshData) => replay_snapshots(socket, telemetry).await,
        Ok(DashboardCommand::DisconnectClient { client_id }) => {
            if !telemetry.evict_client(&client_id) {
                debug!(client = %client_id, "disconnect requested for unknown client");
            }
            Ok(())
        }
        Ok(DashboardCommand::RestartServer) => {
            warn!("dashboard requested a restart; in-process restart is not supported");
            Ok(())
        }
        Err(e) => {
            debug!(error = %e, "ignoring malformed dashboard command");
            Ok(())
        }
    }
}
