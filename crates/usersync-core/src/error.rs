// ── Core error types ──
//
// Errors surfaced by the store and its runtime configuration. Consumers
// never match on reqwest or serde errors directly: the
// `From<usersync_api::Error>` impl folds them into these variants, and the
// store records the `Display` text of whichever variant it got.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to user API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Server errors ────────────────────────────────────────────────
    /// The server answered with a non-200 envelope code.
    ///
    /// Displays as the server message alone, so the store keeps exactly
    /// what the server said.
    #[error("{message}")]
    Rejected { code: Option<i64>, message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the server answered at all).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a `CoreError`, kept next to the message the
/// store records so consumers can react without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Timeout,
    NotFound,
    Rejected,
    Api,
    Config,
    Internal,
}

impl CoreError {
    /// Returns `true` if the server reported the entity as missing, either
    /// with HTTP 404 or with an envelope code of 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Rejected { code, .. } => *code == Some(404),
            Self::Api { status, .. } => *status == Some(404),
            _ => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        if self.is_not_found() {
            return ErrorKind::NotFound;
        }
        match self {
            Self::ConnectionFailed { .. } => ErrorKind::Connection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::Api { .. } => ErrorKind::Api,
            Self::Config { .. } => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<usersync_api::Error> for CoreError {
    fn from(err: usersync_api::Error) -> Self {
        match err {
            usersync_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            usersync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            usersync_api::Error::InvalidBaseUrl { url, reason } => CoreError::Config {
                message: format!("Invalid base URL {url}: {reason}"),
            },
            usersync_api::Error::ClientBuild(reason) => CoreError::Config {
                message: format!("Failed to build HTTP client: {reason}"),
            },
            usersync_api::Error::Rejected { code, message } => {
                CoreError::Rejected { code, message }
            }
            usersync_api::Error::Serialization(e) => {
                CoreError::Internal(format!("Serialization error: {e}"))
            }
            usersync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
