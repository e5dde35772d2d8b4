//! Suite and test-case restriction.

/// Restricts a plan to one suite and/or one test case by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDirective {
    /// Keep only entries of this suite
    pub suite: Option<String>,
    /// Keep only entries with this test name
    pub test: Option<String>,
}

impl FilterDirective {
    pub fn suite(name: impl Into<String>) -> Self {
        Self {
            suite: Some(name.into()),
            test: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.suite.is_none() && self.test.is_none()
    }

    pub fn matches(&self, suite: &str, test: &str) -> bool {
        self.suite.as_deref().map_or(true, |s| s == suite)
            && self.test.as_deref().map_or(true, |t| t == test)
    }
}
