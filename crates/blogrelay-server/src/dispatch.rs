//! Request dispatch: lookup, validation, invocation, outcome accounting.
//!
//! The dispatch boundary is the single point where failures become uniform
//! `{"error": ...}` payloads. Nothing a handler returns or fails with can
//! crash the process or reach a transport as anything but structured JSON.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::registry::ToolRegistry;
use crate::telemetry::TelemetrySink;

/// Decoded wire request, shared by both transports.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    /// Tool name to invoke
    pub tool: String,
    /// Tool parameters; an absent field means "no parameters"
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    json!({})
}

/// Routes validated requests to tool handlers and records outcomes.
pub struct Dispatcher {
    registry: ToolRegistry,
    telemetry: Arc<TelemetrySink>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tools", &self.registry.tool_names())
            .finish()
    }
}

impl Dispatcher {
    /// Build a dispatcher over a populated registry.
    #[must_use]
    pub fn new(registry: ToolRegistry, telemetry: Arc<TelemetrySink>) -> Self {
        Self {
            registry,
            telemetry,
        }
    }

    /// Registered tool names, in registration order.
    #[must_use]
    pub fn tool_names(&self) -> &[String] {
        self.registry.tool_names()
    }

    /// Decode a raw JSON message and dispatch it.
    ///
    /// Undecodable input yields a parse-error payload; it never reaches the
    /// registry and is not recorded.
    pub async fn handle_raw(&self, raw: &str) -> Value {
        match serde_json::from_str::<ToolRequest>(raw) {
            Ok(request) => self.dispatch(&request.tool, request.params).await,
            Err(e) => {
                debug!(error = %e, "undecodable request");
                json!({"error": format!("parse error: {e}")})
            }
        }
    }

    /// Dispatch one named tool call.
    ///
    /// Unknown names and schema-invalid parameters are rejected before the
    /// handler runs and leave every telemetry counter untouched; only
    /// dispatched calls are recorded as success or failure.
    pub async fn dispatch(&self, name: &str, params: Value) -> Value {
        let Some(entry) = self.registry.get(name) else {
            debug!(tool = %name, "unknown tool requested");
            return json!({"error": format!("tool not found: {name}")});
        };

        if let Err(e) = entry.validate_args(&params) {
            debug!(tool = %name, error = %e, "rejected at validation");
            return json!({"error": e.to_string()});
        }

        let start = Instant::now();
        let result = entry.handler().handle(params).await;
        let latency = start.elapsed();

        match result {
            Ok(payload) => {
                self.telemetry.record_dispatch(name, true, latency);
                debug!(tool = %name, latency_ms = latency.as_millis() as u64, "dispatch completed");
                payload
            }
            Err(e) => {
                self.telemetry.record_dispatch(name, false, latency);
                warn!(tool = %name, error = %e, "dispatch failed");
                json!({"error": format!("execution error: {e}")})
            }
        }
    }
}
