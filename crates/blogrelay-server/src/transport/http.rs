//! Connection-oriented transport: tool calls over HTTP POST.
//!
//! `POST /` with a JSON `{"tool", "params"}` body returns the dispatcher's
//! JSON response with status 200 - including dispatch-level error envelopes;
//! HTTP status codes describe the transport exchange, not the tool outcome.
//! `OPTIONS` answers preflight with 200, any other method gets 405, and an
//! unparseable body gets 400 with a parse-error payload. Permissive CORS
//! headers are attached to every response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use blogrelay_types::{RelayError, RelayResult};

use crate::dispatch::{Dispatcher, ToolRequest};
use crate::telemetry::TelemetrySink;

#[derive(Clone)]
struct HttpState {
    dispatcher: Arc<Dispatcher>,
    telemetry: Arc<TelemetrySink>,
}

/// Build the transport router. Exposed for in-process tests.
pub fn router(dispatcher: Arc<Dispatcher>, telemetry: Arc<TelemetrySink>) -> Router {
    let state = HttpState {
        dispatcher,
        telemetry,
    };
    Router::new()
        .route(
            "/",
            post(handle_tool_call)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve the HTTP transport until the process exits.
///
/// # Errors
///
/// `RelayError::Transport` on an invalid address, a failed bind (port
/// already in use) or a fatal server error. These are the only failures
/// that should take the process down.
pub async fn run(
    host: &str,
    port: u16,
    dispatcher: Arc<Dispatcher>,
    telemetry: Arc<TelemetrySink>,
) -> RelayResult<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| RelayError::Transport(format!("invalid address '{host}:{port}': {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::Transport(format!("failed to bind {addr}: {e}")))?;

    info!(%addr, "serving on http");

    let app = router(dispatcher, telemetry);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| RelayError::Transport(format!("server error: {e}")))
}

async fn handle_tool_call(
    State(state): State<HttpState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> impl IntoResponse {
    let request: ToolRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(peer = %addr, error = %e, "unparseable request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("parse error: {e}")})),
            );
        }
    };

    // Client identity: ephemeral port as the id, source IP alongside
    state
        .telemetry
        .touch_client(&addr.port().to_string(), Some(&addr.ip().to_string()));

    let response = state.dispatcher.dispatch(&request.tool, request.params).await;
    (StatusCode::OK, Json(response))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "method not allowed"})),
    )
}
