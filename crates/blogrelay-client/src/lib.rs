//! # Blogrelay Client
//!
//! Typed client for the upstream Blogger v3 REST API, plus the derived
//! operations the upstream API does not offer natively:
//!
//! - [`BloggerClient`] - one method per upstream primitive (list/get blogs,
//!   list/get/create/update/delete posts). Failures map to
//!   `RelayError::Upstream` with no retries; they propagate immediately.
//! - Aggregation ([`aggregate`]) - label discovery and free-text search,
//!   synthesized client-side from plain post listings.
//!
//! The upstream service owns canonical Blog/Post data; nothing here caches
//! beyond a single request's lifetime.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod client;

pub use aggregate::LABEL_SCAN_WINDOW;
pub use client::{BloggerClient, BloggerClientConfig, DEFAULT_BASE_URL};
