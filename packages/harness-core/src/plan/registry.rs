//! Registration of externally supplied test cases.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::executor::{TestContext, TestResult};

/// Entry point of one test case.
pub type TestFn = Arc<dyn Fn(&TestContext<'_>) -> TestResult + Send + Sync>;

/// A named test case.
#[derive(Clone)]
pub struct TestCase {
    pub name: String,
    pub run: TestFn,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// Test cases grouped by suite. Suites and the cases within each suite keep
/// registration order.
#[derive(Debug, Default, Clone)]
pub struct TestRegistry {
    suites: HashMap<String, Vec<TestCase>>,
    order: Vec<String>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a case to `suite`.
    pub fn register<F>(&mut self, suite: &str, name: &str, run: F) -> &mut Self
    where
        F: Fn(&TestContext<'_>) -> TestResult + Send + Sync + 'static,
    {
        if !self.suites.contains_key(suite) {
            self.order.push(suite.to_string());
        }
        self.suites
            .entry(suite.to_string())
            .or_default()
            .push(TestCase {
                name: name.to_string(),
                run: Arc::new(run),
            });
        self
    }

    /// Cases registered under `suite`, in registration order.
    pub fn cases(&self, suite: &str) -> &[TestCase] {
        self.suites.get(suite).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of every suite with at least one case, in registration order.
    pub fn suite_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.suites.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
