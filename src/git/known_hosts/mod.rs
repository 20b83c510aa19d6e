// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! OpenSSH `known_hosts` verification.
//!
//! ```text
//! known_hosts line
//!   [@marker] patterns keytype base64-key [comment]
//!      |         |
//!      |         +-- host,*.example.com,!bad.example.com,[host]:2222
//!      |         +-- |1|salt|hmac-sha1(salt, name)
//!      +-- @revoked         key is rejected for matching hosts
//!      +-- @cert-authority  ignored (no certificate support)
//!
//! HostKeyPolicy { known_hosts path, checking }
//!   .verifier(port) --> HostKeyVerifier
//!
//! HostKeyVerifier::verify(host, key)
//!   checking = no        --> accept
//!   key not offered      --> Unavailable
//!   KnownHosts::check    --> Trusted | Mismatch | Revoked | Unknown
//! ```
//!
//! Lines that cannot be parsed are skipped, as OpenSSH does.

use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use bon::Builder;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Environment variable naming an alternative `known_hosts` file.
pub const KNOWN_HOSTS_ENV: &str = "SSH_KNOWN_HOSTS";

const DEFAULT_SSH_PORT: u16 = 22;

/// Whether SSH host keys must be present in `known_hosts`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StrictHostKeyChecking {
    /// Reject unknown and mismatching host keys
    #[default]
    Yes,
    /// Accept any host key
    No,
}

impl std::fmt::Display for StrictHostKeyChecking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
        }
    }
}

/// Outcome of looking a host key up in `known_hosts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKeyStatus {
    /// A matching entry carries this exact key.
    Trusted,
    /// The host is known with a different key of the same type.
    Mismatch,
    /// The key is listed under `@revoked`.
    Revoked,
    /// No entry for this host and key type.
    Unknown,
}

/// Host key verification failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostKeyError {
    #[error("host key for '{host}' does not match known_hosts")]
    Mismatch { host: String },

    #[error("host key for '{host}' has been revoked")]
    Revoked { host: String },

    #[error("host '{host}' is not in known_hosts")]
    Unknown { host: String },

    #[error("server '{host}' did not present a host key")]
    Unavailable { host: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    None,
    Revoked,
    CertAuthority,
}

#[derive(Debug, Clone)]
enum HostPatterns {
    /// Comma-separated patterns; `!` negates.
    Plain(Vec<(bool, String)>),
    /// `|1|salt|hash`
    Hashed { salt: Vec<u8>, hash: Vec<u8> },
}

impl HostPatterns {
    fn parse(field: &str) -> Option<Self> {
        if let Some(rest) = field.strip_prefix("|1|") {
            let (salt, hash) = rest.split_once('|')?;
            return Some(Self::Hashed {
                salt: BASE64_STANDARD.decode(salt).ok()?,
                hash: BASE64_STANDARD.decode(hash).ok()?,
            });
        }
        let patterns = field
            .split(',')
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.strip_prefix('!')
                    .map_or((false, p.to_ascii_lowercase()), |p| {
                        (true, p.to_ascii_lowercase())
                    })
            })
            .collect::<Vec<_>>();
        (!patterns.is_empty()).then_some(Self::Plain(patterns))
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Plain(patterns) => {
                let name = name.to_ascii_lowercase();
                let mut matched = false;
                for (negated, pattern) in patterns {
                    if glob_match(pattern.as_bytes(), name.as_bytes()) {
                        if *negated {
                            return false;
                        }
                        matched = true;
                    }
                }
                matched
            }
            Self::Hashed { salt, hash } => {
                let Ok(mut mac) = Hmac::<Sha1>::new_from_slice(salt) else {
                    return false;
                };
                mac.update(name.as_bytes());
                mac.verify_slice(hash).is_ok()
            }
        }
    }
}

#[derive(Debug, Clone)]
struct HostEntry {
    marker: Marker,
    hosts: HostPatterns,
    key_type: String,
    key: Vec<u8>,
}

impl HostEntry {
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let mut first = fields.next()?;
        let marker = match first {
            "@revoked" => Marker::Revoked,
            "@cert-authority" => Marker::CertAuthority,
            m if m.starts_with('@') => return None,
            _ => Marker::None,
        };
        if marker != Marker::None {
            first = fields.next()?;
        }
        let hosts = HostPatterns::parse(first)?;
        let key_type = fields.next()?.to_string();
        let key = BASE64_STANDARD.decode(fields.next()?).ok()?;
        Some(Self {
            marker,
            hosts,
            key_type,
            key,
        })
    }
}

/// Parsed `known_hosts` database.
#[derive(Debug, Clone, Default)]
pub struct KnownHosts {
    entries: Vec<HostEntry>,
}

impl KnownHosts {
    /// Parse `known_hosts` text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match HostEntry::parse(line) {
                Some(entry) => entries.push(entry),
                None => trace!(line = number + 1, "skipping malformed known_hosts line"),
            }
        }
        Self { entries }
    }

    /// Read and parse a `known_hosts` file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let known_hosts = Self::parse(&text);
        debug!(path = %path.display(), entries = known_hosts.len(), "loaded known_hosts");
        Ok(known_hosts)
    }

    /// Name under which `host` is recorded: bare for port 22, `[host]:port` otherwise.
    #[must_use]
    pub fn lookup_name(host: &str, port: Option<u16>) -> String {
        match port {
            Some(port) if port != DEFAULT_SSH_PORT => format!("[{host}]:{port}"),
            _ => host.to_string(),
        }
    }

    /// Look `key` (SSH wire-format public key blob) up for `name`.
    #[must_use]
    pub fn check(&self, name: &str, key: &[u8]) -> HostKeyStatus {
        let key_type = blob_key_type(key);
        let mut status = HostKeyStatus::Unknown;

        for entry in self.entries.iter().filter(|e| e.hosts.matches(name)) {
            match entry.marker {
                Marker::CertAuthority => {}
                Marker::Revoked if entry.key == key => return HostKeyStatus::Revoked,
                Marker::Revoked => {}
                Marker::None if entry.key == key => status = HostKeyStatus::Trusted,
                Marker::None => {
                    if status == HostKeyStatus::Unknown
                        && key_type.is_some_and(|t| t == entry.key_type)
                    {
                        status = HostKeyStatus::Mismatch;
                    }
                }
            }
        }
        status
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where host keys come from and whether they are enforced.
#[derive(Debug, Clone, Default, Builder)]
pub struct HostKeyPolicy {
    /// `known_hosts` file. `None` trusts no host.
    #[builder(setters(name = with_known_hosts))]
    known_hosts: Option<PathBuf>,

    #[builder(setters(name = with_checking), default)]
    checking: StrictHostKeyChecking,
}

impl HostKeyPolicy {
    #[must_use]
    pub fn known_hosts(&self) -> Option<&Path> {
        self.known_hosts.as_deref()
    }

    #[must_use]
    pub const fn checking(&self) -> StrictHostKeyChecking {
        self.checking
    }

    /// Build the verifier for an SSH remote on `port`.
    ///
    /// A `known_hosts` file that does not exist counts as empty.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if an existing `known_hosts` file cannot be read.
    pub fn verifier(&self, port: Option<u16>) -> std::io::Result<HostKeyVerifier> {
        if self.checking == StrictHostKeyChecking::No {
            return Ok(HostKeyVerifier::accept_any());
        }
        let known_hosts = match &self.known_hosts {
            Some(path) => match KnownHosts::load(path) {
                Ok(known_hosts) => known_hosts,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "known_hosts file does not exist");
                    KnownHosts::default()
                }
                Err(e) => return Err(e),
            },
            None => KnownHosts::default(),
        };
        Ok(HostKeyVerifier::new(known_hosts, port))
    }
}

/// Verifies the host key an SSH server presents during a clone.
#[derive(Debug, Clone)]
pub struct HostKeyVerifier {
    known_hosts: KnownHosts,
    port: Option<u16>,
    checking: StrictHostKeyChecking,
}

impl HostKeyVerifier {
    /// Check presented keys against `known_hosts` for a remote on `port`.
    #[must_use]
    pub const fn new(known_hosts: KnownHosts, port: Option<u16>) -> Self {
        Self {
            known_hosts,
            port,
            checking: StrictHostKeyChecking::Yes,
        }
    }

    /// Accept every host key.
    #[must_use]
    pub const fn accept_any() -> Self {
        Self {
            known_hosts: KnownHosts {
                entries: Vec::new(),
            },
            port: None,
            checking: StrictHostKeyChecking::No,
        }
    }

    #[must_use]
    pub const fn checking(&self) -> StrictHostKeyChecking {
        self.checking
    }

    /// Decide whether `key` is acceptable for `host`.
    ///
    /// # Errors
    ///
    /// Returns a [`HostKeyError`] describing why the key is rejected.
    pub fn verify(&self, host: &str, key: Option<&[u8]>) -> Result<(), HostKeyError> {
        if self.checking == StrictHostKeyChecking::No {
            debug!(host, "host key checking disabled");
            return Ok(());
        }
        let Some(key) = key else {
            return Err(HostKeyError::Unavailable {
                host: host.to_string(),
            });
        };

        let name = KnownHosts::lookup_name(host, self.port);
        let status = self.known_hosts.check(&name, key);
        debug!(host = %name, ?status, "host key lookup");
        match status {
            HostKeyStatus::Trusted => Ok(()),
            HostKeyStatus::Mismatch => Err(HostKeyError::Mismatch { host: name }),
            HostKeyStatus::Revoked => Err(HostKeyError::Revoked { host: name }),
            HostKeyStatus::Unknown => Err(HostKeyError::Unknown { host: name }),
        }
    }
}

/// Key type named by the first string of an SSH public key blob.
fn blob_key_type(blob: &[u8]) -> Option<&str> {
    let (len, rest) = blob.split_first_chunk::<4>()?;
    let len = usize::try_from(u32::from_be_bytes(*len)).ok()?;
    rest.get(..len).and_then(|t| std::str::from_utf8(t).ok())
}

/// `*` and `?` wildcard match over lowercase ASCII.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some(b'*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == b'?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == b'*')
}
