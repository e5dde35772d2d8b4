//! Transport-security settings.
//!
//! [`TlsBuilder`] accumulates settings while flags are parsed. The
//! lifecycle manager moves its contents into the cluster configuration with
//! [`TlsBuilder::take_config`]; afterwards the builder is empty and owns
//! nothing.

use std::path::PathBuf;

/// Immutable TLS settings handed to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    pub enable: bool,
    /// Skip certificate verification, encrypt only
    pub encrypt_only: bool,
    pub ca_file: Option<PathBuf>,
    pub ca_path: Option<PathBuf>,
    pub protocols: Option<String>,
    pub cipher_suite: Option<String>,
    /// Check revocation of leaf certificates
    pub crl_check: bool,
    /// Check revocation of every certificate in the chain
    pub crl_check_all: bool,
    pub cert_blacklist: Option<PathBuf>,
    pub log_session_info: bool,
    /// Client key for mutual authentication
    pub key_file: Option<PathBuf>,
    /// Client certificate chain for mutual authentication
    pub chain_file: Option<PathBuf>,
}

impl TlsConfig {
    /// One-line description of the active settings, suitable for logs.
    pub fn summary(&self) -> String {
        if !self.enable {
            return "tls disabled".to_string();
        }
        let mut parts = vec!["tls enabled".to_string()];
        if self.encrypt_only {
            parts.push("encrypt-only".to_string());
        }
        let paths = [
            ("ca_file", &self.ca_file),
            ("ca_path", &self.ca_path),
            ("cert_blacklist", &self.cert_blacklist),
            ("key_file", &self.key_file),
            ("chain_file", &self.chain_file),
        ];
        for (label, path) in paths {
            if let Some(path) = path {
                parts.push(format!("{}={}", label, path.display()));
            }
        }
        if let Some(protocols) = &self.protocols {
            parts.push(format!("protocols={}", protocols));
        }
        if let Some(cipher_suite) = &self.cipher_suite {
            parts.push(format!("cipher_suite={}", cipher_suite));
        }
        if self.crl_check_all {
            parts.push("crl_check_all".to_string());
        } else if self.crl_check {
            parts.push("crl_check".to_string());
        }
        if self.log_session_info {
            parts.push("log_session_info".to_string());
        }
        parts.join(", ")
    }
}

/// Mutable TLS aggregate filled in flag by flag.
#[derive(Debug, Default)]
pub struct TlsBuilder {
    inner: TlsConfig,
}

impl TlsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self) -> &mut Self {
        self.inner.enable = true;
        self
    }

    pub fn encrypt_only(&mut self) -> &mut Self {
        self.inner.encrypt_only = true;
        self
    }

    pub fn ca_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.inner.ca_file = Some(path.into());
        self
    }

    pub fn ca_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.inner.ca_path = Some(path.into());
        self
    }

    pub fn protocols(&mut self, protocols: impl Into<String>) -> &mut Self {
        self.inner.protocols = Some(protocols.into());
        self
    }

    pub fn cipher_suite(&mut self, cipher_suite: impl Into<String>) -> &mut Self {
        self.inner.cipher_suite = Some(cipher_suite.into());
        self
    }

    pub fn crl_check(&mut self) -> &mut Self {
        self.inner.crl_check = true;
        self
    }

    pub fn crl_check_all(&mut self) -> &mut Self {
        self.inner.crl_check_all = true;
        self
    }

    pub fn cert_blacklist(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.inner.cert_blacklist = Some(path.into());
        self
    }

    pub fn log_session_info(&mut self) -> &mut Self {
        self.inner.log_session_info = true;
        self
    }

    pub fn key_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.inner.key_file = Some(path.into());
        self
    }

    pub fn chain_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.inner.chain_file = Some(path.into());
        self
    }

    /// Read access to the settings accumulated so far.
    pub fn peek(&self) -> &TlsConfig {
        &self.inner
    }

    /// Returns true when nothing has been set, or the contents were taken.
    pub fn is_empty(&self) -> bool {
        self.inner == TlsConfig::default()
    }

    /// Moves every accumulated setting out, leaving the builder empty.
    pub fn take_config(&mut self) -> TlsConfig {
        std::mem::take(&mut self.inner)
    }
}

impl From<TlsConfig> for TlsBuilder {
    fn from(inner: TlsConfig) -> Self {
        Self { inner }
    }
}
