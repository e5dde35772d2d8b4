//! Command-line parsing.

use std::path::PathBuf;

use harness_core::cli::{parse_args, ExitReason, ParseOutcome, RunConfig};
use harness_core::config::MAX_HOST_SIZE;
use harness_core::password::hash_password;
use harness_core::HarnessError;

use crate::helpers::FixedPrompt;

fn proceed(args: &[&str], prompt: &FixedPrompt) -> RunConfig {
    let mut argv = vec!["harness-runner"];
    argv.extend_from_slice(args);
    match parse_args(argv, prompt).unwrap() {
        ParseOutcome::Proceed(config) => *config,
        ParseOutcome::Exit { reason, .. } => panic!("unexpected exit: {:?}", reason),
    }
}

fn exit_reason(args: &[&str]) -> (ExitReason, String) {
    let mut argv = vec!["harness-runner"];
    argv.extend_from_slice(args);
    match parse_args(argv, &FixedPrompt::new("unused")).unwrap() {
        ParseOutcome::Exit { reason, message } => (reason, message),
        ParseOutcome::Proceed(config) => panic!("unexpected proceed: {:?}", config),
    }
}

#[test]
fn test_defaults() {
    let config = proceed(&[], &FixedPrompt::new("unused"));
    assert_eq!(config.profile.hosts, "127.0.0.1");
    assert_eq!(config.profile.port, 3000);
    assert!(config.profile.user.is_none());
    assert!(config.profile.password.is_none());
    assert!(config.filter.is_empty());
    assert!(config.tls.is_empty());
}

#[test]
fn test_hosts_port_and_filters() {
    let config = proceed(
        &["-h", "db1:3100,db2", "-p", "3200", "-U", "admin", "-S", "key_basics", "-T", "put"],
        &FixedPrompt::new("unused"),
    );
    assert_eq!(config.profile.hosts, "db1:3100,db2");
    assert_eq!(config.profile.port, 3200);
    assert_eq!(config.profile.user.as_deref(), Some("admin"));
    assert_eq!(config.filter.suite.as_deref(), Some("key_basics"));
    assert_eq!(config.filter.test.as_deref(), Some("put"));
}

#[test]
fn test_long_option_aliases() {
    let config = proceed(
        &["--host=db1", "--suite", "scan_basics", "--test", "scan"],
        &FixedPrompt::new("unused"),
    );
    assert_eq!(config.profile.hosts, "db1");
    assert_eq!(config.filter.suite.as_deref(), Some("scan_basics"));
    assert_eq!(config.filter.test.as_deref(), Some("scan"));
}

#[test]
fn test_host_at_capacity_is_rejected() {
    let prompt = FixedPrompt::new("unused");
    let at_limit = "a".repeat(MAX_HOST_SIZE);
    let err = parse_args(["harness-runner", "-h", at_limit.as_str()], &prompt).unwrap_err();
    assert!(matches!(err, HarnessError::Configuration(_)), "{:?}", err);

    let below = "a".repeat(MAX_HOST_SIZE - 1);
    let config = proceed(&["-h", below.as_str()], &prompt);
    assert_eq!(config.profile.hosts.len(), MAX_HOST_SIZE - 1);
}

#[test]
fn test_oversized_user_is_rejected() {
    let user = "u".repeat(64);
    let err = parse_args(
        ["harness-runner", "-U", user.as_str()],
        &FixedPrompt::new("unused"),
    )
    .unwrap_err();
    assert!(matches!(err, HarnessError::Configuration(_)));
}

#[test]
fn test_tls_flags_accumulate() {
    let mut config = proceed(
        &[
            "--tlsEnable",
            "--tlsEncryptOnly",
            "--tlsCaFile",
            "ca.pem",
            "--tlsCaPath",
            "/etc/ca",
            "--tlsProtocols",
            "TLSv1.2",
            "--tlsCipherSuite",
            "ALL",
            "--tlsCrlCheck",
            "--tlsCrlCheckAll",
            "--tlsCertBlackList",
            "blacklist.txt",
            "--tlsLogSessionInfo",
            "--tlsKeyFile",
            "client.key",
            "--tlsChainFile",
            "client.pem",
        ],
        &FixedPrompt::new("unused"),
    );
    let tls = config.tls.take_config();
    assert!(tls.enable);
    assert!(tls.encrypt_only);
    assert_eq!(tls.ca_file, Some(PathBuf::from("ca.pem")));
    assert_eq!(tls.ca_path, Some(PathBuf::from("/etc/ca")));
    assert_eq!(tls.protocols.as_deref(), Some("TLSv1.2"));
    assert_eq!(tls.cipher_suite.as_deref(), Some("ALL"));
    assert!(tls.crl_check);
    assert!(tls.crl_check_all);
    assert_eq!(tls.cert_blacklist, Some(PathBuf::from("blacklist.txt")));
    assert!(tls.log_session_info);
    assert_eq!(tls.key_file, Some(PathBuf::from("client.key")));
    assert_eq!(tls.chain_file, Some(PathBuf::from("client.pem")));
    assert!(config.tls.is_empty());
}

#[test]
fn test_usage_flag_exits_with_usage() {
    for flag in ["-u", "--usage"] {
        let (reason, message) = exit_reason(&[flag]);
        assert_eq!(reason, ExitReason::Usage);
        assert!(message.contains("--tlsChainFile"));
    }
}

#[test]
fn test_unknown_flag_exits_with_usage() {
    let (reason, message) = exit_reason(&["--bogus"]);
    assert_eq!(reason, ExitReason::UnrecognizedOption);
    assert!(message.contains("--hosts"));
}

#[test]
fn test_non_numeric_port_exits_with_usage() {
    let (reason, _) = exit_reason(&["-p", "abc"]);
    assert_eq!(reason, ExitReason::UnrecognizedOption);
}

#[test]
fn test_version_exits() {
    let (reason, message) = exit_reason(&["--version"]);
    assert_eq!(reason, ExitReason::Version);
    assert!(message.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_attached_password_values_are_hashed() {
    let prompt = FixedPrompt::new("unused");
    let expected = hash_password("secret").unwrap();

    let short = proceed(&["-U", "admin", "-Psecret"], &prompt);
    assert_eq!(short.profile.password.as_ref(), Some(&expected));

    let long = proceed(&["--password=secret"], &prompt);
    assert_eq!(long.profile.password.as_ref(), Some(&expected));
    assert_eq!(prompt.calls(), 0);
}

#[test]
fn test_bare_password_flag_prompts_and_keeps_next_token() {
    let prompt = FixedPrompt::new("typed");
    let config = proceed(&["-P", "key_basics", "-S", "key_apply"], &prompt);

    assert_eq!(prompt.calls(), 1);
    assert_eq!(config.profile.password, Some(hash_password("typed").unwrap()));
    // The token after a bare -P is an operand, not the password.
    assert_eq!(config.filter.suite.as_deref(), Some("key_apply"));
}

#[test]
fn test_option_values_may_start_with_a_hyphen() {
    let prompt = FixedPrompt::new("unused");
    let config = proceed(&["-U", "-admin", "-S", "-suite", "--tlsCaFile", "-ca.pem"], &prompt);
    assert_eq!(config.profile.user.as_deref(), Some("-admin"));
    assert_eq!(config.filter.suite.as_deref(), Some("-suite"));
    assert_eq!(config.tls.peek().ca_file, Some(PathBuf::from("-ca.pem")));
}

#[test]
fn test_user_named_like_password_flag_does_not_prompt() {
    let prompt = FixedPrompt::new("unused");
    let config = proceed(&["-U", "-P"], &prompt);
    assert_eq!(config.profile.user.as_deref(), Some("-P"));
    assert!(config.profile.password.is_none());
    assert_eq!(prompt.calls(), 0);
}
