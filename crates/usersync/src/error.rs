//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants and store failures into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use usersync_config::ConfigError;
use usersync_core::{CoreError, ErrorKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the user API at {url}")]
    #[diagnostic(
        code(usersync::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}\n\
             Try: usersync --base-url http://host:port/api users list"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(usersync::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { url: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(usersync::not_found),
        help("Run: usersync users list to see existing users")
    )]
    NotFound { message: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Server rejected the request: {message}")]
    #[diagnostic(code(usersync::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(code(usersync::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(usersync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(usersync::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: usersync --profile {name} --base-url <URL> config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(usersync::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(usersync::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Output ───────────────────────────────────────────────────────
    #[error("Could not render output: {reason}")]
    #[diagnostic(code(usersync::output))]
    Output { reason: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Rebuild an error from what a read action left in the store.
    ///
    /// `base_url` stands in for the request URL, which the store does not
    /// keep.
    pub fn from_store(message: String, kind: Option<ErrorKind>, base_url: &str) -> Self {
        match kind {
            Some(ErrorKind::Connection) => Self::ConnectionFailed {
                url: base_url.into(),
                reason: message,
            },
            Some(ErrorKind::Timeout) => Self::Timeout {
                url: base_url.into(),
            },
            Some(ErrorKind::NotFound) => Self::NotFound { message },
            Some(ErrorKind::Rejected) => Self::Rejected { message },
            Some(ErrorKind::Config) => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            Some(ErrorKind::Api | ErrorKind::Internal) | None => Self::ApiError { message },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_not_found() {
            return CliError::NotFound {
                message: err.to_string(),
            };
        }

        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { url } => CliError::Timeout { url },

            CoreError::Rejected { message, .. } => CliError::Rejected { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            err @ (CoreError::Api { .. } | CoreError::Internal(_)) => CliError::ApiError {
                message: err.to_string(),
            },
        }
    }
}
