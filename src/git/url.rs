// mercator-rs: project source cloner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote URL inspection.
//!
//! ```text
//! https://host/org/repo        Https
//! ssh://git@host:2222/org/repo Ssh  host, port
//! git@host:org/repo            Ssh  (SCP-like)
//! file:///srv/repo, /srv/repo  Local
//! ```
//!
//! The URL handed to the engine is never rewritten; this only feeds host-key
//! lookup and log redaction.

use url::Url;

/// Transport family of a remote URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    Https,
    Http,
    Ssh,
    Git,
    Local,
    Unknown,
}

/// Parsed view of a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    raw: String,
    kind: RemoteKind,
    host: Option<String>,
    port: Option<u16>,
}

impl RemoteUrl {
    /// Classify `raw`. Never fails: unrecognized input is `RemoteKind::Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.contains("://") {
            return Self::parse_scheme(raw);
        }
        if let Some((user_host, path)) = raw.split_once(':')
            && !user_host.is_empty()
            && !user_host.contains('/')
            && !path.starts_with("//")
            && !is_windows_drive(user_host)
        {
            let host = user_host
                .rsplit_once('@')
                .map_or(user_host, |(_, host)| host);
            return Self {
                raw: raw.to_string(),
                kind: RemoteKind::Ssh,
                host: Some(host.to_ascii_lowercase()),
                port: None,
            };
        }
        Self {
            raw: raw.to_string(),
            kind: RemoteKind::Local,
            host: None,
            port: None,
        }
    }

    fn parse_scheme(raw: &str) -> Self {
        let Ok(url) = Url::parse(raw) else {
            return Self {
                raw: raw.to_string(),
                kind: RemoteKind::Unknown,
                host: None,
                port: None,
            };
        };
        let kind = match url.scheme() {
            "https" => RemoteKind::Https,
            "http" => RemoteKind::Http,
            "ssh" | "git+ssh" | "ssh+git" => RemoteKind::Ssh,
            "git" => RemoteKind::Git,
            "file" => RemoteKind::Local,
            _ => RemoteKind::Unknown,
        };
        Self {
            raw: raw.to_string(),
            kind,
            host: url.host_str().map(str::to_ascii_lowercase),
            port: url.port(),
        }
    }

    /// Transport family.
    #[must_use]
    pub const fn kind(&self) -> RemoteKind {
        self.kind
    }

    /// Host name, lowercased, if the URL has one.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Explicit port, if given.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Whether the clone will go through the SSH transport.
    #[must_use]
    pub const fn is_ssh(&self) -> bool {
        matches!(self.kind, RemoteKind::Ssh)
    }

    /// URL safe for logs: any password component is replaced.
    #[must_use]
    pub fn redacted(&self) -> String {
        if self.raw.contains("://")
            && let Ok(mut url) = Url::parse(&self.raw)
            && url.password().is_some()
            && url.set_password(Some("***")).is_ok()
        {
            return url.to_string();
        }
        self.raw.clone()
    }
}

fn is_windows_drive(prefix: &str) -> bool {
    prefix.len() == 1 && prefix.chars().all(|c| c.is_ascii_alphabetic())
}
