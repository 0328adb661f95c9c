//! # Blogrelay Server
//!
//! Tool-protocol server exposing a Blogger-backed content API.
//!
//! The request path: a transport adapter ([`transport`]) decodes one raw
//! message into `{tool, params}`, the [`dispatch::Dispatcher`] validates the
//! parameters against the tool's declared schema and invokes its handler
//! (which calls the upstream client), the [`telemetry::TelemetrySink`]
//! records the outcome and pushes fresh snapshots to [`dashboard`]
//! subscribers, and the adapter writes the response back.
//!
//! Two interchangeable transports, selected by configuration:
//!
//! - **stdio**: newline-delimited JSON over stdin/stdout, strictly ordered
//! - **http**: `POST /` with a JSON body, permissive CORS, concurrent
//!   connections

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod dashboard;
pub mod dispatch;
pub mod handler;
pub mod registry;
pub mod telemetry;
pub mod tools;
pub mod transport;

pub use config::{RelayConfig, ServerMode};
pub use dispatch::Dispatcher;
pub use handler::{FunctionToolHandler, ToolHandler};
pub use registry::ToolRegistry;
pub use telemetry::TelemetrySink;

/// Server name advertised in logs.
pub const SERVER_NAME: &str = "blogrelay";
/// Server version advertised in logs.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
