//! Client collaborator interface and a TCP reachability client.
//!
//! The harness never speaks the data-store protocol itself. It hands a
//! [`ClusterConfig`] to a [`Connector`] and keeps the returned
//! [`ClientHandle`] alive between start and stop. [`TcpConnector`] is the
//! stock implementation: it opens a plain TCP session to the first reachable
//! seed and nothing more.

use std::io;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::Level;

use crate::error::RemoteError;
use crate::host::Host;
use crate::password::PasswordHash;
use crate::tls::TlsConfig;

/// One log record emitted by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub function: &'static str,
    pub file: &'static str,
    pub line: u32,
    pub message: String,
}

/// Receives client log records; returns false to reject the record.
pub type LogSink = Arc<dyn Fn(&LogRecord) -> bool + Send + Sync>;

/// Settings used to open the cluster connection.
#[derive(Debug)]
pub struct ClusterConfig {
    /// Seed hosts, in the order given
    pub hosts: Vec<Host>,
    pub user: Option<String>,
    pub password: Option<PasswordHash>,
    /// Transport security, moved in from the TLS builder
    pub tls: TlsConfig,
    pub connect_timeout: Duration,
    /// Directory holding the system record scripts
    pub script_system_path: PathBuf,
    /// Directory holding the test record scripts
    pub script_user_path: PathBuf,
}

/// Opens client connections.
pub trait Connector: Send + Sync {
    /// Routes client log records at or above `level` into `sink`.
    fn set_log_sink(&self, level: Level, sink: LogSink);

    /// Opens a connection. `worker` is the background network worker when
    /// async networking is enabled.
    fn connect(
        &self,
        config: &ClusterConfig,
        worker: Option<&Handle>,
    ) -> Result<Box<dyn ClientHandle>, RemoteError>;
}

/// A live client connection.
pub trait ClientHandle: Send + Sync {
    /// Seed hosts the client was opened with.
    fn seeds(&self) -> &[Host];

    fn is_connected(&self) -> bool;

    /// Closes the connection. The handle is destroyed when dropped.
    fn close(&mut self) -> Result<(), RemoteError>;
}

/// Connects over plain TCP to verify the cluster is reachable.
#[derive(Default)]
pub struct TcpConnector {
    sink: RwLock<Option<(Level, LogSink)>>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    fn log(&self, level: Level, function: &'static str, message: String) {
        let guard = self.sink.read();
        let Some((max_level, sink)) = guard.as_ref() else {
            return;
        };
        if level > *max_level {
            return;
        }
        let location = Location::caller();
        sink(&LogRecord {
            level,
            function,
            file: location.file(),
            line: location.line(),
            message,
        });
    }
}

impl Connector for TcpConnector {
    fn set_log_sink(&self, level: Level, sink: LogSink) {
        *self.sink.write() = Some((level, sink));
    }

    fn connect(
        &self,
        config: &ClusterConfig,
        _worker: Option<&Handle>,
    ) -> Result<Box<dyn ClientHandle>, RemoteError> {
        if config.tls.enable {
            self.log(
                Level::INFO,
                "connect",
                format!("{} (not negotiated by reachability client)", config.tls.summary()),
            );
        }

        let mut failures = Vec::new();
        for host in &config.hosts {
            match connect_seed(host, config.connect_timeout) {
                Ok(stream) => {
                    self.log(Level::DEBUG, "connect", format!("connected to seed {}", host));
                    return Ok(Box::new(TcpClient {
                        seeds: config.hosts.clone(),
                        stream: Some(stream),
                    }));
                }
                Err(e) => {
                    self.log(Level::WARN, "connect", format!("seed {} unreachable: {}", host, e));
                    failures.push(format!("{}: {}", host, e));
                }
            }
        }

        Err(RemoteError::new(
            "connect",
            format!("Failed to connect to any seed host ({})", failures.join("; ")),
        ))
    }
}

fn connect_seed(host: &Host, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_error = io::Error::new(io::ErrorKind::NotFound, "no address resolved");
    for addr in (host.name.as_str(), host.port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

struct TcpClient {
    seeds: Vec<Host>,
    stream: Option<TcpStream>,
}

impl ClientHandle for TcpClient {
    fn seeds(&self) -> &[Host] {
        &self.seeds
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn close(&mut self) -> Result<(), RemoteError> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        match stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(RemoteError::new("close", format!("Failed to close connection: {}", e))),
        }
    }
}
