use thiserror::Error;

/// Top-level error type for the `usersync-api` crate.
///
/// Covers every failure mode of the transport and the response envelope.
/// `usersync-core` maps these into the single message the store records.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, non-2xx status).
    ///
    /// Carries the reqwest error exactly as the HTTP layer produced it.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot anchor API paths.
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Envelope ────────────────────────────────────────────────────
    /// The server answered with an envelope whose `code` is not 200.
    ///
    /// Displays as the server message alone so it can be shown verbatim.
    #[error("{message}")]
    Rejected { code: Option<i64>, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The request payload could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request hit the transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error, at either layer.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Rejected { code, .. } => *code == Some(404),
            _ => false,
        }
    }

    /// The envelope code of a rejected response, if any.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rejected { code, .. } => *code,
            _ => None,
        }
    }

    /// The HTTP status of a failed transport call, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_server_message_verbatim() {
        let err = Error::Rejected {
            code: Some(500),
            message: "dup email".into(),
        };
        assert_eq!(err.to_string(), "dup email");
        assert_eq!(err.code(), Some(500));
        assert!(!err.is_transient());
    }

    #[test]
    fn rejected_404_is_not_found() {
        let err = Error::Rejected {
            code: Some(404),
            message: "user not found".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_timeout());
    }
}
