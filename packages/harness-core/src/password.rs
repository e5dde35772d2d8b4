//! Password prompting and hashing.
//!
//! The server stores a bcrypt digest computed with a fixed salt, so the
//! harness hashes the secret as soon as it is read and keeps only the digest.

use std::fmt;
use std::io;

use bcrypt::Version;

use crate::error::HarnessError;
use crate::Result;

/// Length of the `$2a$` formatted digest.
pub const PASSWORD_HASH_LEN: usize = 60;

const HASH_COST: u32 = 10;

// Raw bytes of the bcrypt-base64 salt "7EqJtq98hPqEX7fNZaFWoO".
const HASH_SALT: [u8; 16] = [
    0xf4, 0x6b, 0x0b, 0xbe, 0xcf, 0xfe, 0x8d, 0x1b, 0x06, 0x67, 0xd8, 0x4f, 0x6d, 0xc1, 0xd8, 0xa9,
];

/// Fixed-length bcrypt digest of a user's password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash(<{} bytes>)", self.0.len())
    }
}

/// Source of interactively entered secrets.
pub trait SecretPrompt {
    /// Reads one secret without echoing it.
    fn read_secret(&self, prompt: &str) -> io::Result<String>;
}

/// Reads the secret from the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn read_secret(&self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

/// Hashes `secret` with the server's fixed salt.
pub fn hash_password(secret: &str) -> Result<PasswordHash> {
    let parts = bcrypt::hash_with_salt(secret, HASH_COST, HASH_SALT)
        .map_err(|e| HarnessError::Configuration(format!("Failed to hash password: {}", e)))?;
    Ok(PasswordHash(parts.format_for_version(Version::TwoA)))
}

/// Hashes the inline password, or prompts for one when the inline value is
/// missing or empty.
pub fn prompt_hash(inline: Option<&str>, prompt: &dyn SecretPrompt) -> Result<PasswordHash> {
    match inline {
        Some(secret) if !secret.is_empty() => hash_password(secret),
        _ => {
            let secret = prompt
                .read_secret("Enter Password: ")
                .map_err(|e| HarnessError::Configuration(format!("Failed to read password: {}", e)))?;
            hash_password(&secret)
        }
    }
}
