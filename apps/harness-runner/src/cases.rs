//! Connectivity cases bundled with the runner.

use harness_core::executor::{TestContext, TestFailure, TestResult};
use harness_core::host::Host;
use harness_core::plan::TestRegistry;

/// Cases available to every run.
pub fn registry() -> TestRegistry {
    let mut registry = TestRegistry::new();
    registry
        .register("info_basics", "connected", connected)
        .register("info_basics", "seeds_match_profile", seeds_match_profile);
    registry
}

fn connected(ctx: &TestContext<'_>) -> TestResult {
    if ctx.client().is_connected() {
        Ok(())
    } else {
        Err(TestFailure::new("client reports no live connection"))
    }
}

fn seeds_match_profile(ctx: &TestContext<'_>) -> TestResult {
    let profile = ctx.profile();
    let expected = Host::parse_list(&profile.hosts, profile.port)
        .map_err(|e| TestFailure::new(e.to_string()))?;
    let seeds = ctx.client().seeds();
    if seeds == expected.as_slice() {
        Ok(())
    } else {
        Err(TestFailure::new(format!(
            "expected seeds {:?}, client has {:?}",
            expected, seeds
        )))
    }
}
