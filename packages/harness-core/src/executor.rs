//! Sequential plan execution.
//!
//! Runs the before hook once, every entry in plan order on the calling
//! thread, then the after hook once. A failed before hook aborts the run; a
//! failed or panicking test is recorded and the run continues.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tokio::runtime::Handle;

use crate::client::ClientHandle;
use crate::config::ConnectionProfile;
use crate::error::HarnessError;
use crate::lifecycle::Harness;
use crate::plan::TestPlan;

/// Failure reported by a test case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TestFailure {
    pub message: String,
}

impl TestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result returned by a test case.
pub type TestResult = Result<(), TestFailure>;

/// What a running test may use.
pub struct TestContext<'a> {
    client: &'a dyn ClientHandle,
    worker: Option<&'a Handle>,
    profile: &'a ConnectionProfile,
    suite: &'a str,
    name: &'a str,
}

impl<'a> TestContext<'a> {
    pub fn client(&self) -> &'a dyn ClientHandle {
        self.client
    }

    /// The background network worker, when async networking is enabled.
    pub fn worker(&self) -> Option<&'a Handle> {
        self.worker
    }

    pub fn profile(&self) -> &'a ConnectionProfile {
        self.profile
    }

    pub fn suite(&self) -> &'a str {
        self.suite
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Runs `future` on the background worker and blocks until it finishes.
    pub fn block_on<F>(&self, future: F) -> Result<F::Output, TestFailure>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let worker = self
            .worker
            .ok_or_else(|| TestFailure::new("async networking is not enabled"))?;
        worker
            .block_on(worker.spawn(future))
            .map_err(|e| TestFailure::new(format!("async task failed: {}", e)))
    }
}

/// Outcome of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Panicked,
}

/// Result of one test entry.
#[derive(Debug, Clone, Serialize)]
pub struct TestRecord {
    pub suite: String,
    pub name: String,
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u64,
}

/// Summary of a plan run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Set when the before hook failed and nothing ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_error: Option<String>,
    /// Set when the after hook reported an error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_error: Option<String>,
    pub results: Vec<TestRecord>,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Passed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    /// True when startup succeeded and every test passed. Shutdown errors are
    /// informational.
    pub fn success(&self) -> bool {
        self.startup_error.is_none() && self.failed() == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs assembled plans.
pub struct PlanExecutor;

impl PlanExecutor {
    pub fn run(plan: &TestPlan, harness: &mut Harness) -> RunReport {
        let mut report = RunReport::default();

        if let Err(e) = (plan.before())(harness) {
            tracing::error!("plan aborted before any test ran: {}", e);
            report.startup_error = Some(e.to_string());
            return report;
        }

        match harness.session() {
            Some(session) => {
                for entry in plan.entries() {
                    let context = TestContext {
                        client: session.client(),
                        worker: session.worker(),
                        profile: harness.profile(),
                        suite: entry.suite,
                        name: &entry.name,
                    };
                    let started = Instant::now();
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (entry.run)(&context)));
                    let (status, message) = match outcome {
                        Ok(Ok(())) => (TestStatus::Passed, None),
                        Ok(Err(failure)) => (TestStatus::Failed, Some(failure.message)),
                        Err(panic) => {
                            let msg = if let Some(msg) = panic.downcast_ref::<&str>() {
                                msg.to_string()
                            } else if let Some(msg) = panic.downcast_ref::<String>() {
                                msg.clone()
                            } else {
                                "unknown panic".to_string()
                            };
                            (TestStatus::Panicked, Some(msg))
                        }
                    };
                    match &message {
                        Some(msg) => tracing::error!("{}.{} failed: {}", entry.suite, entry.name, msg),
                        None => tracing::info!("{}.{} passed", entry.suite, entry.name),
                    }
                    report.results.push(TestRecord {
                        suite: entry.suite.to_string(),
                        name: entry.name.clone(),
                        status,
                        message,
                        duration_ms: started.elapsed().as_millis() as u64,
                    });
                }
            }
            None => {
                report.startup_error = Some(HarnessError::NotInitialized.to_string());
                return report;
            }
        }

        if let Err(e) = (plan.after())(harness) {
            report.shutdown_error = Some(e.to_string());
        }

        tracing::info!(
            "{} passed, {} failed of {} tests",
            report.passed(),
            report.failed(),
            report.results.len()
        );
        report
    }
}
