//! Command-line parsing.
//!
//! Produces the connection profile, the TLS builder and the plan filter, or
//! tells the caller to stop before any suite runs.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::config::{ConnectionProfile, DEFAULT_HOST, DEFAULT_PORT, MAX_HOST_SIZE, MAX_USER_SIZE};
use crate::error::HarnessError;
use crate::password::{self, SecretPrompt};
use crate::plan::FilterDirective;
use crate::tls::TlsBuilder;
use crate::Result;

const HOST_EXAMPLES: &str = "\
Host examples:
  host1
  host1:3000,host2:3000
  192.168.1.10:cert1:3000,192.168.1.20:cert2:3000

The tlsname is only used when connecting with a secure TLS enabled server.
If the port is not specified, the default port is used.";

/// Options that consume the following token as their value.
const VALUE_FLAGS: &[&str] = &[
    "-h",
    "--hosts",
    "--host",
    "-p",
    "--port",
    "-U",
    "--user",
    "-S",
    "--suite",
    "-T",
    "--testcase",
    "--test",
    "--tlsCaFile",
    "--tlsCaPath",
    "--tlsProtocols",
    "--tlsCipherSuite",
    "--tlsCertBlackList",
    "--tlsKeyFile",
    "--tlsChainFile",
];

/// Command-line arguments for the test harness.
#[derive(Parser, Debug)]
#[command(
    name = "harness-runner",
    author,
    version,
    about = "Runs the cluster client integration test plan",
    long_about = None,
    disable_help_flag = true,
    after_help = HOST_EXAMPLES
)]
pub struct Cli {
    /// Server seed hosts: <host1>[:<tlsname1>][:<port1>],...
    #[arg(
        short = 'h',
        long = "hosts",
        visible_alias = "host",
        default_value = DEFAULT_HOST,
        allow_hyphen_values = true
    )]
    pub hosts: String,

    /// The default server port
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT, allow_hyphen_values = true)]
    pub port: u16,

    /// The user to connect as
    #[arg(short = 'U', long, allow_hyphen_values = true)]
    pub user: Option<String>,

    /// The user's password; prompts when no value is attached (-Psecret, --password=secret)
    #[arg(short = 'P', long, num_args = 0..=1, default_missing_value = "")]
    pub password: Option<String>,

    /// Run only this suite
    #[arg(short = 'S', long, allow_hyphen_values = true)]
    pub suite: Option<String>,

    /// Run only this test case
    #[arg(short = 'T', long = "testcase", visible_alias = "test", allow_hyphen_values = true)]
    pub testcase: Option<String>,

    /// Enable TLS
    #[arg(long = "tlsEnable")]
    pub tls_enable: bool,

    /// Disable TLS certificate verification
    #[arg(long = "tlsEncryptOnly")]
    pub tls_encrypt_only: bool,

    /// TLS certificate authority file
    #[arg(long = "tlsCaFile", value_name = "PATH", allow_hyphen_values = true)]
    pub tls_ca_file: Option<String>,

    /// TLS certificate authority directory
    #[arg(long = "tlsCaPath", value_name = "PATH", allow_hyphen_values = true)]
    pub tls_ca_path: Option<String>,

    /// TLS protocol selection criteria
    #[arg(long = "tlsProtocols", value_name = "PROTOCOLS", allow_hyphen_values = true)]
    pub tls_protocols: Option<String>,

    /// TLS cipher selection criteria
    #[arg(long = "tlsCipherSuite", value_name = "SUITE", allow_hyphen_values = true)]
    pub tls_cipher_suite: Option<String>,

    /// Enable CRL checking for leaf certs
    #[arg(long = "tlsCrlCheck")]
    pub tls_crl_check: bool,

    /// Enable CRL checking for all certs
    #[arg(long = "tlsCrlCheckAll")]
    pub tls_crl_check_all: bool,

    /// Path to a certificate blacklist file
    #[arg(long = "tlsCertBlackList", value_name = "PATH", allow_hyphen_values = true)]
    pub tls_cert_blacklist: Option<String>,

    /// Log TLS connected session info
    #[arg(long = "tlsLogSessionInfo")]
    pub tls_log_session_info: bool,

    /// TLS client key file for mutual authentication
    #[arg(long = "tlsKeyFile", value_name = "PATH", allow_hyphen_values = true)]
    pub tls_key_file: Option<String>,

    /// TLS client chain file for mutual authentication
    #[arg(long = "tlsChainFile", value_name = "PATH", allow_hyphen_values = true)]
    pub tls_chain_file: Option<String>,

    /// Display program usage
    #[arg(short = 'u', long)]
    pub usage: bool,

    /// Stray operands, ignored
    #[arg(hide = true)]
    pub operands: Vec<String>,
}

/// Everything a run needs from the command line.
#[derive(Debug)]
pub struct RunConfig {
    pub profile: ConnectionProfile,
    pub tls: TlsBuilder,
    pub filter: FilterDirective,
}

/// Why parsing asked the caller to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `-u/--usage` was given
    Usage,
    /// An unknown flag or a malformed value
    UnrecognizedOption,
    /// `--version` was given
    Version,
}

/// Result of a successful parse.
#[derive(Debug)]
pub enum ParseOutcome {
    /// Continue with this configuration
    Proceed(Box<RunConfig>),
    /// Stop before running anything; `message` is the text to print
    Exit { reason: ExitReason, message: String },
}

/// Full usage text.
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

/// Parses `args` (program name first).
///
/// A bare `-P` or `--password` never takes the next token as its value; only
/// an attached value counts, and without one the secret is read from
/// `prompt`. An oversized host or user is a configuration error.
pub fn parse_args<I, T>(args: I, prompt: &dyn SecretPrompt) -> Result<ParseOutcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = normalize_password_flags(args.into_iter().map(Into::into).collect());

    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            return Ok(ParseOutcome::Exit {
                reason: ExitReason::Version,
                message: e.to_string(),
            });
        }
        Err(e) => {
            tracing::error!("unrecognized options: {:?}", e.kind());
            return Ok(ParseOutcome::Exit {
                reason: ExitReason::UnrecognizedOption,
                message: usage(),
            });
        }
    };

    if cli.usage {
        return Ok(ParseOutcome::Exit {
            reason: ExitReason::Usage,
            message: usage(),
        });
    }

    cli.into_run_config(prompt)
        .map(|config| ParseOutcome::Proceed(Box::new(config)))
}

impl Cli {
    /// Validates the parsed flags and builds the run configuration.
    pub fn into_run_config(self, prompt: &dyn SecretPrompt) -> Result<RunConfig> {
        if self.hosts.len() >= MAX_HOST_SIZE {
            tracing::error!("host exceeds max length");
            return Err(HarnessError::Configuration(format!(
                "host exceeds max length ({} >= {})",
                self.hosts.len(),
                MAX_HOST_SIZE
            )));
        }
        tracing::info!("host:           {}", self.hosts);

        if let Some(user) = &self.user {
            if user.len() >= MAX_USER_SIZE {
                tracing::error!("user exceeds max length");
                return Err(HarnessError::Configuration(format!(
                    "user exceeds max length ({} >= {})",
                    user.len(),
                    MAX_USER_SIZE
                )));
            }
            tracing::info!("user:           {}", user);
        }

        let password = self
            .password
            .as_deref()
            .map(|inline| password::prompt_hash(Some(inline), prompt))
            .transpose()?;

        for operand in &self.operands {
            tracing::warn!("ignoring operand '{}'", operand);
        }

        let mut tls = TlsBuilder::new();
        if self.tls_enable {
            tls.enable();
        }
        if self.tls_encrypt_only {
            tls.encrypt_only();
        }
        if let Some(path) = self.tls_ca_file {
            tls.ca_file(path);
        }
        if let Some(path) = self.tls_ca_path {
            tls.ca_path(path);
        }
        if let Some(protocols) = self.tls_protocols {
            tls.protocols(protocols);
        }
        if let Some(cipher_suite) = self.tls_cipher_suite {
            tls.cipher_suite(cipher_suite);
        }
        if self.tls_crl_check {
            tls.crl_check();
        }
        if self.tls_crl_check_all {
            tls.crl_check_all();
        }
        if let Some(path) = self.tls_cert_blacklist {
            tls.cert_blacklist(path);
        }
        if self.tls_log_session_info {
            tls.log_session_info();
        }
        if let Some(path) = self.tls_key_file {
            tls.key_file(path);
        }
        if let Some(path) = self.tls_chain_file {
            tls.chain_file(path);
        }

        Ok(RunConfig {
            profile: ConnectionProfile {
                hosts: self.hosts,
                port: self.port,
                user: self.user,
                password,
            },
            tls,
            filter: FilterDirective {
                suite: self.suite,
                test: self.testcase,
            },
        })
    }
}

/// Rewrites a bare `-P`/`--password` to `--password=` so the parser cannot
/// take the next token as the password.
fn normalize_password_flags(args: Vec<OsString>) -> Vec<OsString> {
    let mut normalized = Vec::with_capacity(args.len());
    let mut expects_value = false;
    let mut end_of_options = false;

    for (idx, arg) in args.into_iter().enumerate() {
        if idx == 0 || end_of_options || expects_value {
            expects_value = false;
            normalized.push(arg);
            continue;
        }
        if arg.as_os_str() == "--" {
            end_of_options = true;
            normalized.push(arg);
            continue;
        }
        if arg.as_os_str() == "-P" || arg.as_os_str() == "--password" {
            normalized.push(OsString::from("--password="));
            continue;
        }
        expects_value = VALUE_FLAGS.iter().any(|flag| arg.as_os_str() == *flag);
        normalized.push(arg);
    }
    normalized
}
