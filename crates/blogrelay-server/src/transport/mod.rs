//! Transport adapters.
//!
//! Both adapters satisfy the same contract: decode one inbound message into
//! a tool request, hand it to the dispatcher, encode the result, write it
//! back. Selection happens at startup via configuration; the dispatcher is
//! transport-agnostic.

pub mod http;
pub mod stdio;
