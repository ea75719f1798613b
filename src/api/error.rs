//! API Error Type
//!
//! One error enum for the wallet/game HTTP boundary. The cycle logic
//! branches on the failure class: a server "conflict" message means the
//! goal is already achieved, a heart-purchase 500 is a transient fault
//! to skip, and everything else propagates to the supervisor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout, or body-decoding failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status. `message` carries the server's JSON
    /// `message` field when present, otherwise the raw body text.
    #[error("{method} {path} -> {status}: {message}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        message: String,
    },

    /// Success status but a payload missing the fields the operation
    /// depends on.
    #[error("unexpected payload from {path}: {detail}")]
    Payload { path: String, detail: String },
}

impl ApiError {
    /// HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Payload { .. } => None,
        }
    }

    pub fn is_status(&self, code: u16) -> bool {
        self.status() == Some(code)
    }

    /// Whether the server's message field matches a known conflict marker
    /// such as `PLAYER_ALREADY_IN_SESSION` or `UPGRADE_IN_PROGRESS`.
    pub fn has_message(&self, marker: &str) -> bool {
        matches!(self, ApiError::Status { message, .. } if message == marker)
    }

    /// Whether this failure should trigger re-authentication rather than
    /// a plain cycle retry.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
