//! Harness configuration.

use std::path::PathBuf;
use std::time::Duration;

use tracing::Level;

use crate::password::PasswordHash;

/// Capacity of the host specification buffer, terminator included.
pub const MAX_HOST_SIZE: usize = 1024;
/// Capacity of the user name buffer, terminator included.
pub const MAX_USER_SIZE: usize = 64;
/// Seed host used when none is given.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Server port used by host entries that omit one.
pub const DEFAULT_PORT: u16 = 3000;

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// Comma-separated `host[:tlsname][:port]` entries
    pub hosts: String,
    /// Port for entries without one
    pub port: u16,
    /// User to authenticate as
    pub user: Option<String>,
    /// Hashed password, never the raw secret
    pub password: Option<PasswordHash>,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: None,
            password: None,
        }
    }
}

/// Settings applied by the lifecycle manager when it opens the connection.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Most verbose client log level forwarded to the reporting stream
    pub client_log_level: Level,
    /// Directory holding the system record scripts
    pub script_system_path: PathBuf,
    /// Directory holding the test record scripts
    pub script_user_path: PathBuf,
    /// How long stop() waits for background tasks to drain
    pub worker_shutdown_timeout_ms: u64,
}

impl LifecycleConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn worker_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_shutdown_timeout_ms)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 1000,
            client_log_level: Level::INFO,
            script_system_path: PathBuf::from("modules/lua-core/src"),
            script_user_path: PathBuf::from("src/test/lua"),
            worker_shutdown_timeout_ms: 1000,
        }
    }
}

/// Features of the client build the harness is running against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Non-blocking networking is available; async suites are planned and a
    /// background worker is started.
    pub async_networking: bool,
}

impl Capabilities {
    pub fn sync_only() -> Self {
        Self {
            async_networking: false,
        }
    }

    pub fn with_async() -> Self {
        Self {
            async_networking: true,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            async_networking: cfg!(feature = "event-loop"),
        }
    }
}
