//! Connection lifecycle state machine.
//!
//! `Uninitialized → Connected → Closed`. The client handle lives inside
//! [`LifecycleState::Connected`], so at most one handle exists and it cannot
//! outlive [`Harness::stop`]. `Closed` is terminal: a destroyed handle is
//! never reopened.

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::client::{ClientHandle, ClusterConfig, Connector};
use crate::config::{Capabilities, ConnectionProfile, LifecycleConfig};
use crate::error::HarnessError;
use crate::host::Host;
use crate::logging;
use crate::tls::TlsBuilder;
use crate::worker::EventLoop;
use crate::Result;

/// A connected client together with the resources it depends on.
pub struct Session {
    client: Box<dyn ClientHandle>,
    worker: Option<EventLoop>,
    config: ClusterConfig,
}

impl Session {
    pub fn client(&self) -> &dyn ClientHandle {
        self.client.as_ref()
    }

    /// Handle to the background network worker, if one was started.
    pub fn worker(&self) -> Option<&Handle> {
        self.worker.as_ref().map(EventLoop::handle)
    }

    /// Configuration the connection was opened with.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }
}

/// Lifecycle state of the shared client.
pub enum LifecycleState {
    Uninitialized,
    Connected(Session),
    Closed,
}

impl LifecycleState {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Connected(_) => "connected",
            LifecycleState::Closed => "closed",
        }
    }
}

/// Starts the background network worker.
pub type WorkerFactory = fn() -> Result<EventLoop>;

/// Owner of the single client connection shared by every test.
pub struct Harness {
    profile: ConnectionProfile,
    tls: TlsBuilder,
    settings: LifecycleConfig,
    capabilities: Capabilities,
    connector: Arc<dyn Connector>,
    worker_factory: WorkerFactory,
    state: LifecycleState,
}

impl Harness {
    /// Creates an unstarted harness. The TLS settings stay in `tls` until
    /// [`Harness::start`] moves them into the cluster configuration.
    pub fn new(profile: ConnectionProfile, tls: TlsBuilder, connector: Arc<dyn Connector>) -> Self {
        Self {
            profile,
            tls,
            settings: LifecycleConfig::default(),
            capabilities: Capabilities::default(),
            connector,
            worker_factory: EventLoop::create,
            state: LifecycleState::Uninitialized,
        }
    }

    pub fn with_settings(mut self, settings: LifecycleConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Replaces how the background worker is started.
    pub fn with_worker_factory(mut self, factory: WorkerFactory) -> Self {
        self.worker_factory = factory;
        self
    }

    pub fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// The live session, present only while connected.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            LifecycleState::Connected(session) => Some(session),
            _ => None,
        }
    }

    /// Installs client logging, starts the background worker when async
    /// networking is enabled, validates the seed hosts and connects.
    ///
    /// On a connect failure the harness stays uninitialized, the worker is
    /// torn down and the TLS settings return to the builder.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Uninitialized => {}
            LifecycleState::Connected(_) => {
                tracing::error!("client was already initialized");
                return Err(HarnessError::AlreadyInitialized);
            }
            LifecycleState::Closed => {
                tracing::error!("client handle was destroyed");
                return Err(HarnessError::HandleDestroyed);
            }
        }

        self.connector
            .set_log_sink(self.settings.client_log_level, logging::reporting_sink());

        let worker = if self.capabilities.async_networking {
            Some((self.worker_factory)().inspect_err(|e| tracing::error!("{}", e))?)
        } else {
            None
        };

        let hosts = Host::parse_list(&self.profile.hosts, self.profile.port)
            .inspect_err(|e| tracing::error!("{}", e))?;

        let config = ClusterConfig {
            hosts,
            user: self.profile.user.clone(),
            password: self.profile.password.clone(),
            tls: self.tls.take_config(),
            connect_timeout: self.settings.connect_timeout(),
            script_system_path: self.settings.script_system_path.clone(),
            script_user_path: self.settings.script_user_path.clone(),
        };
        if config.tls.enable {
            tracing::info!("{}", config.tls.summary());
        }

        match self
            .connector
            .connect(&config, worker.as_ref().map(EventLoop::handle))
        {
            Ok(client) => {
                tracing::debug!("connected to {} {}", self.profile.hosts, self.profile.port);
                self.state = LifecycleState::Connected(Session {
                    client,
                    worker,
                    config,
                });
                Ok(())
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.tls = TlsBuilder::from(config.tls);
                if let Some(worker) = worker {
                    worker.shutdown(self.settings.worker_shutdown_timeout());
                }
                Err(e.into())
            }
        }
    }

    /// Closes the connection, destroys the handle and stops the worker.
    ///
    /// The harness ends up closed even when the close itself fails; that
    /// error is returned for reporting only.
    pub fn stop(&mut self) -> Result<()> {
        let session = match std::mem::replace(&mut self.state, LifecycleState::Closed) {
            LifecycleState::Connected(session) => session,
            other => {
                self.state = other;
                tracing::error!("client was not initialized");
                return Err(HarnessError::NotInitialized);
            }
        };

        let Session {
            mut client,
            worker,
            config,
        } = session;
        let status = client.close();
        drop(client);
        drop(config);

        if let Some(worker) = worker {
            worker.shutdown(self.settings.worker_shutdown_timeout());
        }

        match status {
            Ok(()) => {
                tracing::debug!("disconnected from {} {}", self.profile.hosts, self.profile.port);
                Ok(())
            }
            Err(e) => {
                tracing::error!("{}", e);
                Err(e.into())
            }
        }
    }
}
