//! Unified error type for blogrelay operations.
//!
//! Every failure in the workspace funnels into [`RelayError`]. The dispatcher
//! is the single point where these become uniform `{"error": ...}` payloads;
//! nothing below it lets an error escape to a transport.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type RelayResult<T> = Result<T, RelayError>;

/// Unified error for client, aggregation and dispatch failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// Request parameters failed schema validation. Raised before dispatch;
    /// handlers never see these.
    #[error("invalid parameters: {0}")]
    Validation(String),

    /// A named entity does not exist (e.g. a label absent from the
    /// aggregated set).
    #[error("{0}")]
    NotFound(String),

    /// Any failure reported by the upstream content service - network,
    /// auth, not-found-upstream, rate-limit. Sub-causes are not
    /// distinguished; the upstream message is forwarded as-is.
    #[error("upstream request failed{}: {message}", status_suffix(.status))]
    Upstream {
        /// HTTP status, when the upstream responded at all
        status: Option<u16>,
        /// Upstream (or transport) error message
        message: String,
    },

    /// Transport-level failure. Fatal only at startup (e.g. port already
    /// bound); never produced by a dispatched request.
    #[error("transport error: {0}")]
    Transport(String),

    /// Invariant violation inside the server itself.
    #[error("internal error: {0}")]
    Internal(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl RelayError {
    /// Entity-absent error with a preformatted message.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Upstream failure without an HTTP status (connect error, timeout).
    ///
    /// `From<reqwest::Error>` cannot live here (the error type is defined in
    /// this dependency-light crate); callers map at the call site instead.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// Upstream failure carrying the HTTP status it answered with.
    #[must_use]
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// True when the error should terminate the process. Only transport
    /// startup failures qualify; no dispatched operation is fatal.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            RelayError::Validation("missing field `blogId`".into()).to_string(),
            "invalid parameters: missing field `blogId`"
        );
        assert_eq!(
            RelayError::not_found("label 'missing' not found").to_string(),
            "label 'missing' not found"
        );
        assert_eq!(
            RelayError::upstream_status(404, "Post not found").to_string(),
            "upstream request failed (404): Post not found"
        );
        assert_eq!(
            RelayError::upstream("connection refused").to_string(),
            "upstream request failed: connection refused"
        );
    }

    #[test]
    fn only_transport_errors_are_fatal() {
        assert!(RelayError::Transport("address in use".into()).is_fatal());
        assert!(!RelayError::upstream("boom").is_fatal());
        assert!(!RelayError::Validation("bad".into()).is_fatal());
        assert!(!RelayError::not_found("x").is_fatal());
    }
}
