//! # Blogrelay Types
//!
//! Core types shared across the blogrelay workspace - the single source of
//! truth for everything that crosses a wire:
//!
//! - **Content types**: [`Blog`], [`Post`], [`Label`] and their list envelopes,
//!   mirroring the upstream Blogger v3 JSON shapes
//! - **Tool types**: [`Tool`] and [`ToolInputSchema`] describing the callable
//!   surface exposed to tool-protocol clients
//! - **Telemetry types**: [`ServerStats`], [`ServerStatus`], [`ClientConnection`]
//!   snapshots consumed by the status dashboard
//! - **Error type**: [`RelayError`] with the [`RelayResult`] alias
//!
//! All wire types serialize in camelCase so payloads round-trip unchanged
//! against the upstream API and the dashboard.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod content;
pub mod error;
pub mod telemetry;
pub mod tool;

// Re-export everything at the crate root for convenience
pub use content::*;
pub use error::*;
pub use telemetry::*;
pub use tool::*;

/// Version of the blogrelay-types crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
