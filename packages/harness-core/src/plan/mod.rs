//! Test plan assembly.
//!
//! The plan is built from the fixed suite catalogs, the registered test
//! cases and the filter directive, and carries exactly one before/after hook
//! pair delegating to the lifecycle manager.

pub mod catalog;
mod filter;
mod registry;

use std::fmt;

use crate::config::Capabilities;
use crate::lifecycle::Harness;
use crate::Result;

pub use filter::FilterDirective;
pub use registry::{TestCase, TestFn, TestRegistry};

/// Hook run once around the whole plan.
pub type Hook = fn(&mut Harness) -> Result<()>;

/// One planned test.
#[derive(Clone)]
pub struct TestEntry {
    pub suite: &'static str,
    pub name: String,
    pub run: TestFn,
}

impl fmt::Debug for TestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestEntry")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .finish()
    }
}

/// Ordered, filtered test entries plus their lifecycle hooks.
pub struct TestPlan {
    entries: Vec<TestEntry>,
    before: Hook,
    after: Hook,
}

impl TestPlan {
    pub fn entries(&self) -> &[TestEntry] {
        &self.entries
    }

    pub fn before(&self) -> Hook {
        self.before
    }

    pub fn after(&self) -> Hook {
        self.after
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(suite, test)` pairs in plan order.
    pub fn names(&self) -> Vec<(&'static str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.suite, e.name.as_str()))
            .collect()
    }
}

impl fmt::Debug for TestPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestPlan")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

/// Builds test plans for one client build.
#[derive(Debug, Clone, Copy)]
pub struct PlanAssembler {
    capabilities: Capabilities,
}

impl PlanAssembler {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    /// Registers the catalog, appends async variants when supported, then
    /// applies `filter`, keeping registration order.
    pub fn assemble(&self, registry: &TestRegistry, filter: &FilterDirective) -> TestPlan {
        for suite in registry.suite_names() {
            if !catalog::is_known(suite) {
                tracing::warn!("suite '{}' is not in the plan catalog; skipping", suite);
            }
        }

        let mut entries: Vec<TestEntry> = catalog::suites(self.capabilities)
            .flat_map(|suite| {
                registry.cases(suite).iter().map(move |case| TestEntry {
                    suite,
                    name: case.name.clone(),
                    run: case.run.clone(),
                })
            })
            .collect();
        let registered = entries.len();

        if !filter.is_empty() {
            entries.retain(|entry| filter.matches(entry.suite, &entry.name));
        }
        tracing::debug!(
            "assembled plan: {} of {} registered entries (suite={:?}, test={:?})",
            entries.len(),
            registered,
            filter.suite,
            filter.test
        );

        TestPlan {
            entries,
            before: Harness::start,
            after: Harness::stop,
        }
    }
}
