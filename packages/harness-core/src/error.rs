//! Harness error types.

use std::panic::Location;

use thiserror::Error;

/// Errors raised while configuring, starting or stopping the harness.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// Malformed or oversized command-line input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// start() called while a client handle is live
    #[error("Client was already initialized")]
    AlreadyInitialized,

    /// stop() called without a live client handle
    #[error("Client was not initialized")]
    NotInitialized,

    /// start() called after the handle was destroyed
    #[error("Client handle was destroyed and cannot be reused")]
    HandleDestroyed,

    /// Host specification does not follow `host[:tlsname][:port]`
    #[error("Invalid host(s) {spec}: {reason}")]
    InvalidHost { spec: String, reason: String },

    /// Background worker could not be created
    #[error("Startup failed: {0}")]
    StartupFatal(String),

    /// Error reported by the remote client
    #[error(transparent)]
    Connection(#[from] RemoteError),
}

impl HarnessError {
    pub(crate) fn invalid_host(spec: &str, reason: impl Into<String>) -> Self {
        HarnessError::InvalidHost {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error reported by a client operation, carrying the call site that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} @ {function}[{file}:{line}]")]
pub struct RemoteError {
    /// Human readable message
    pub message: String,
    /// Client function that failed
    pub function: String,
    /// Source file of the failing call
    pub file: &'static str,
    /// Source line of the failing call
    pub line: u32,
}

impl RemoteError {
    /// Creates an error stamped with the caller's file and line.
    #[track_caller]
    pub fn new(function: impl Into<String>, message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self {
            message: message.into(),
            function: function.into(),
            file: location.file(),
            line: location.line(),
        }
    }
}
