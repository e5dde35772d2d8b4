//! Background network worker for asynchronous test variants.

use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::HarnessError;
use crate::Result;

/// One background worker thread servicing every non-blocking client operation
/// for the lifetime of a run.
#[derive(Debug)]
pub struct EventLoop {
    runtime: Runtime,
}

impl EventLoop {
    /// Starts the worker thread.
    pub fn create() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("harness-event-loop")
            .enable_all()
            .build()
            .map_err(|e| HarnessError::StartupFatal(format!("failed to create event loop: {}", e)))?;
        tracing::debug!("event loop started");
        Ok(Self { runtime })
    }

    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    /// Stops the worker, waiting up to `timeout` for in-flight tasks.
    pub fn shutdown(self, timeout: Duration) {
        self.runtime.shutdown_timeout(timeout);
        tracing::debug!("event loop stopped");
    }
}
