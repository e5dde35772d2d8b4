//! Seed host grammar: comma-separated `host[:tlsname][:port]` entries.
//!
//! IPv6 literals are bracketed (`[::1]:3000`). When an entry has a single
//! suffix it is read as a port if numeric and as a TLS name otherwise.

use std::fmt;

use crate::config::MAX_HOST_SIZE;
use crate::error::HarnessError;
use crate::Result;

/// One parsed seed host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Host name or address
    pub name: String,
    /// Name expected on the server certificate
    pub tls_name: Option<String>,
    /// Server port
    pub port: u16,
}

impl Host {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            tls_name: None,
            port,
        }
    }

    /// Parses a full host specification, applying `default_port` to entries
    /// without an explicit port.
    pub fn parse_list(spec: &str, default_port: u16) -> Result<Vec<Host>> {
        if spec.is_empty() {
            return Err(HarnessError::invalid_host(spec, "no hosts given"));
        }
        if spec.len() >= MAX_HOST_SIZE {
            return Err(HarnessError::invalid_host(
                spec,
                format!("host list exceeds {} bytes", MAX_HOST_SIZE - 1),
            ));
        }
        spec.split(',')
            .map(|entry| Self::parse_entry(spec, entry, default_port))
            .collect()
    }

    fn parse_entry(spec: &str, entry: &str, default_port: u16) -> Result<Host> {
        if entry.is_empty() {
            return Err(HarnessError::invalid_host(spec, "empty host entry"));
        }

        let (name, rest) = if let Some(bracketed) = entry.strip_prefix('[') {
            let end = bracketed.find(']').ok_or_else(|| {
                HarnessError::invalid_host(spec, format!("unterminated '[' in '{}'", entry))
            })?;
            (&bracketed[..end], &bracketed[end + 1..])
        } else {
            match entry.find(':') {
                Some(idx) => (&entry[..idx], &entry[idx..]),
                None => (entry, ""),
            }
        };

        if name.is_empty() {
            return Err(HarnessError::invalid_host(
                spec,
                format!("missing host name in '{}'", entry),
            ));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(HarnessError::invalid_host(
                spec,
                format!("whitespace in host name '{}'", name),
            ));
        }

        let mut host = Host::new(name, default_port);
        if rest.is_empty() {
            return Ok(host);
        }
        let suffix = rest.strip_prefix(':').ok_or_else(|| {
            HarnessError::invalid_host(spec, format!("unexpected text after host in '{}'", entry))
        })?;

        let fields: Vec<&str> = suffix.split(':').collect();
        match fields.as_slice() {
            [single] if single.chars().all(|c| c.is_ascii_digit()) => {
                host.port = parse_port(spec, entry, single)?;
            }
            [tls_name] => {
                host.tls_name = Some(parse_tls_name(spec, entry, tls_name)?);
            }
            [tls_name, port] => {
                host.tls_name = Some(parse_tls_name(spec, entry, tls_name)?);
                host.port = parse_port(spec, entry, port)?;
            }
            _ => {
                return Err(HarnessError::invalid_host(
                    spec,
                    format!("too many ':' separated fields in '{}'", entry),
                ))
            }
        }
        Ok(host)
    }
}

fn parse_port(spec: &str, entry: &str, text: &str) -> Result<u16> {
    match text.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(HarnessError::invalid_host(
            spec,
            format!("invalid port '{}' in '{}'", text, entry),
        )),
    }
}

fn parse_tls_name(spec: &str, entry: &str, text: &str) -> Result<String> {
    if text.is_empty() {
        return Err(HarnessError::invalid_host(
            spec,
            format!("empty tls name in '{}'", entry),
        ));
    }
    Ok(text.to_string())
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.contains(':') {
            write!(f, "[{}]", self.name)?;
        } else {
            write!(f, "{}", self.name)?;
        }
        if let Some(tls_name) = &self.tls_name {
            write!(f, ":{}", tls_name)?;
        }
        write!(f, ":{}", self.port)
    }
}
