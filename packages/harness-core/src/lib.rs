//! Connection lifecycle, CLI configuration and test-plan assembly for the
//! cluster integration test harness.
//!
//! The harness owns the single client connection shared by every test,
//! derives connection and TLS settings from the command line, and builds a
//! filtered, ordered plan of test entries wrapped in one before/after hook
//! pair.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod lifecycle;
pub mod logging;
pub mod password;
pub mod plan;
pub mod tls;
pub mod worker;

pub use error::{HarnessError, RemoteError};
pub use lifecycle::Harness;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
