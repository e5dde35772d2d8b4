//! Runs the cluster client integration test plan.
//!
//! Parses the command line, assembles the plan from the registered cases,
//! connects once, runs every planned test and prints a JSON report.

mod cases;

use std::process::ExitCode;
use std::sync::Arc;

use harness_core::cli::{self, ExitReason, ParseOutcome};
use harness_core::client::TcpConnector;
use harness_core::config::Capabilities;
use harness_core::executor::PlanExecutor;
use harness_core::password::TerminalPrompt;
use harness_core::plan::PlanAssembler;
use harness_core::Harness;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = match cli::parse_args(std::env::args_os(), &TerminalPrompt)? {
        ParseOutcome::Proceed(config) => *config,
        ParseOutcome::Exit { reason, message } => {
            eprintln!("{}", message);
            return Ok(match reason {
                ExitReason::UnrecognizedOption => ExitCode::from(2),
                ExitReason::Usage | ExitReason::Version => ExitCode::SUCCESS,
            });
        }
    };

    let capabilities = Capabilities::default();
    let registry = cases::registry();
    let plan = PlanAssembler::new(capabilities).assemble(&registry, &config.filter);
    tracing::info!(
        "running {} tests (async networking: {})",
        plan.len(),
        capabilities.async_networking
    );

    let mut harness = Harness::new(config.profile, config.tls, Arc::new(TcpConnector::new()))
        .with_capabilities(capabilities);
    let report = PlanExecutor::run(&plan, &mut harness);
    println!("{}", report.to_json()?);

    Ok(if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
