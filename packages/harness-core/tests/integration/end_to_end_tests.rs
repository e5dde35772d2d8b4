//! Full runs: command line → plan → before → entries → after.

use std::sync::Arc;

use harness_core::cli::{parse_args, ParseOutcome};
use harness_core::config::Capabilities;
use harness_core::executor::{PlanExecutor, TestFailure, TestStatus};
use harness_core::host::Host;
use harness_core::plan::{FilterDirective, PlanAssembler, TestRegistry};
use harness_core::Harness;
use ntest::timeout;
use parking_lot::Mutex;

use crate::helpers::{full_registry, FixedPrompt, MockConnector};

#[timeout(5000)]
#[test]
fn test_command_line_to_filtered_plan() {
    let outcome = parse_args(
        ["harness-runner", "-h", "10.0.0.5:3000", "-S", "key_basics"],
        &FixedPrompt::new("unused"),
    )
    .unwrap();
    let ParseOutcome::Proceed(config) = outcome else {
        panic!("expected to proceed");
    };

    let hosts = Host::parse_list(&config.profile.hosts, config.profile.port).unwrap();
    assert_eq!(hosts, vec![Host::new("10.0.0.5", 3000)]);

    let plan =
        PlanAssembler::new(Capabilities::with_async()).assemble(&full_registry(), &config.filter);
    assert!(plan.entries().iter().all(|e| e.suite == "key_basics"));
    assert_eq!(plan.len(), 2);

    let connector = MockConnector::failing("Connection refused");
    let mut harness = Harness::new(config.profile, config.tls, connector.clone())
        .with_capabilities(Capabilities::with_async());
    let report = PlanExecutor::run(&plan, &mut harness);

    let startup_error = report.startup_error.as_deref().unwrap();
    assert!(startup_error.starts_with("Connection refused @ mock_connect["));
    assert!(report.results.is_empty());
    assert!(!report.success());
    assert_eq!(connector.connects(), 1);
    assert_eq!(connector.closes(), 0);
}

#[timeout(5000)]
#[test]
fn test_run_executes_entries_in_order_between_hooks() {
    let order: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let mut registry = TestRegistry::new();
    for (suite, name) in [
        ("scan_basics", "scan"),
        ("key_basics", "put"),
        ("key_basics", "get"),
    ] {
        let order = order.clone();
        registry.register(suite, name, move |ctx| {
            assert!(ctx.client().is_connected());
            order.lock().push(format!("{}.{}", ctx.suite(), ctx.name()));
            Ok(())
        });
    }

    let connector = MockConnector::new();
    let plan = PlanAssembler::new(Capabilities::sync_only())
        .assemble(&registry, &FilterDirective::default());
    let mut harness = Harness::new(Default::default(), Default::default(), connector.clone())
        .with_capabilities(Capabilities::sync_only());
    let report = PlanExecutor::run(&plan, &mut harness);

    assert!(report.success());
    assert_eq!(report.passed(), 3);
    assert_eq!(
        *order.lock(),
        vec!["key_basics.put", "key_basics.get", "scan_basics.scan"]
    );
    assert_eq!(connector.connects(), 1);
    assert_eq!(connector.closes(), 1);
    assert!(harness.session().is_none());
}

#[timeout(5000)]
#[test]
fn test_failures_do_not_stop_the_run() {
    let mut registry = TestRegistry::new();
    registry
        .register("key_basics", "fails", |_| Err(TestFailure::new("bin mismatch")))
        .register("key_basics", "panics", |_| panic!("record missing"))
        .register("key_basics", "passes", |_| Ok(()));

    let connector = MockConnector::new();
    *connector.fail_close.lock() = Some("Socket reset".to_string());
    let plan = PlanAssembler::new(Capabilities::sync_only())
        .assemble(&registry, &FilterDirective::default());
    let mut harness = Harness::new(Default::default(), Default::default(), connector.clone())
        .with_capabilities(Capabilities::sync_only());
    let report = PlanExecutor::run(&plan, &mut harness);

    let statuses: Vec<TestStatus> = report.results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![TestStatus::Failed, TestStatus::Panicked, TestStatus::Passed]
    );
    assert_eq!(report.results[0].message.as_deref(), Some("bin mismatch"));
    assert_eq!(report.results[1].message.as_deref(), Some("record missing"));
    assert_eq!(report.failed(), 2);
    assert!(report.shutdown_error.as_deref().unwrap().starts_with("Socket reset"));
    assert_eq!(connector.destroyed(), 1);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["results"][1]["status"], "panicked");
    assert_eq!(json["shutdown_error"].as_str().map(|s| s.starts_with("Socket reset")), Some(true));
}

#[timeout(5000)]
#[test]
fn test_async_entries_run_on_the_worker() {
    let mut registry = TestRegistry::new();
    registry
        .register("key_basics_async", "put", |ctx| {
            let value = ctx.block_on(async { 7 * 6 })?;
            if value == 42 {
                Ok(())
            } else {
                Err(TestFailure::new(format!("unexpected value {}", value)))
            }
        })
        .register("key_basics", "sync_only", |ctx| {
            match ctx.block_on(async {}) {
                Err(_) => Err(TestFailure::new("worker missing in async build")),
                Ok(()) => Ok(()),
            }
        });

    let connector = MockConnector::new();
    let plan = PlanAssembler::new(Capabilities::with_async())
        .assemble(&registry, &FilterDirective::default());
    let mut harness = Harness::new(Default::default(), Default::default(), connector.clone())
        .with_capabilities(Capabilities::with_async());
    let report = PlanExecutor::run(&plan, &mut harness);

    assert!(report.success(), "{:?}", report);
    assert_eq!(report.passed(), 2);
    assert_eq!(report.results[0].suite, "key_basics");
    assert_eq!(report.results[1].suite, "key_basics_async");
}

#[timeout(5000)]
#[test]
fn test_block_on_without_worker_fails_the_test() {
    let mut registry = TestRegistry::new();
    registry.register("key_basics", "needs_worker", |ctx| ctx.block_on(async {}));

    let plan = PlanAssembler::new(Capabilities::sync_only())
        .assemble(&registry, &FilterDirective::default());
    let mut harness = Harness::new(Default::default(), Default::default(), MockConnector::new())
        .with_capabilities(Capabilities::sync_only());
    let report = PlanExecutor::run(&plan, &mut harness);

    assert_eq!(report.results[0].status, TestStatus::Failed);
    assert_eq!(
        report.results[0].message.as_deref(),
        Some("async networking is not enabled")
    );
}
