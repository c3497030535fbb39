//! Orchestrator endpoint resolution.
//!
//! Precedence per field: CLI flag, then `LEARNGEN_HOST` / `LEARNGEN_PORT`,
//! then the stored preference, then `127.0.0.1:8000`.

use std::fmt;

use thiserror::Error;
use url::Url;

use crate::prefs::{PrefKey, PrefStore};

pub const HOST_ENV: &str = "LEARNGEN_HOST";
pub const PORT_ENV: &str = "LEARNGEN_PORT";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EndpointError {
    #[error("invalid port '{value}' (from {origin})")]
    InvalidPort { value: String, origin: Origin },

    #[error("invalid host '{value}' (from {origin})")]
    InvalidHost { value: String, origin: Origin },
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Flag,
    Env,
    Preference,
    Default,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Origin::Flag => "command line",
            Origin::Env => "environment",
            Origin::Preference => "saved preference",
            Origin::Default => "default",
        })
    }
}

/// One candidate value per source, highest precedence first.
#[derive(Debug, Clone, Default)]
pub struct EndpointSources {
    pub flag_host: Option<String>,
    pub flag_port: Option<String>,
    pub env_host: Option<String>,
    pub env_port: Option<String>,
    pub pref_host: Option<String>,
    pub pref_port: Option<String>,
}

impl EndpointSources {
    /// Gather candidates from flags, the process environment, and `prefs`.
    pub fn gather(flag_host: Option<&str>, flag_port: Option<&str>, prefs: &PrefStore) -> Self {
        Self {
            flag_host: flag_host.map(ToString::to_string),
            flag_port: flag_port.map(ToString::to_string),
            env_host: std::env::var(HOST_ENV).ok(),
            env_port: std::env::var(PORT_ENV).ok(),
            pref_host: prefs.get(PrefKey::Host).map(ToString::to_string),
            pref_port: prefs.get(PrefKey::Port).map(ToString::to_string),
        }
    }
}

/// Resolved orchestrator address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Host was given as `https://...`
    pub tls: bool,
    pub host_origin: Origin,
    pub port_origin: Origin,
}

impl Endpoint {
    pub fn resolve(sources: &EndpointSources) -> Result<Self, EndpointError> {
        let (host, host_origin) = pick(
            &sources.flag_host,
            &sources.env_host,
            &sources.pref_host,
        )
        .map_or((DEFAULT_HOST.to_string(), Origin::Default), |(v, o)| {
            (v.to_string(), o)
        });

        let (tls, host) = split_scheme(&host);
        let host = host.trim_end_matches('/').to_string();
        if host.is_empty() || host.contains(['/', ' ', '?', '#']) {
            return Err(EndpointError::InvalidHost {
                value: host,
                origin: host_origin,
            });
        }

        let (port, port_origin) = match pick(
            &sources.flag_port,
            &sources.env_port,
            &sources.pref_port,
        ) {
            Some((raw, origin)) => (
                parse_port(raw).ok_or_else(|| EndpointError::InvalidPort {
                        value: raw.to_string(),
                        origin,
                    })?,
                origin,
            ),
            None => (DEFAULT_PORT, Origin::Default),
        };

        Ok(Self {
            host,
            port,
            tls,
            host_origin,
            port_origin,
        })
    }

    /// Base URL for API calls, e.g. `http://127.0.0.1:8000/`.
    ///
    /// The scheme is `https` only when the host was given with one.
    pub fn base_url(&self) -> Result<Url, EndpointError> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let scheme = if self.tls { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{host}:{}/", self.port)).map_err(|_| {
            EndpointError::InvalidHost {
                value: self.host.clone(),
                origin: self.host_origin,
            }
        })
    }
}

/// Parse a usable TCP port; `0` is rejected.
pub fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|p| *p != 0)
}

fn pick<'a>(
    flag: &'a Option<String>,
    env: &'a Option<String>,
    pref: &'a Option<String>,
) -> Option<(&'a str, Origin)> {
    [
        (flag, Origin::Flag),
        (env, Origin::Env),
        (pref, Origin::Preference),
    ]
    .into_iter()
    .find_map(|(value, origin)| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| (v, origin))
    })
}

fn split_scheme(host: &str) -> (bool, &str) {
    if let Some(rest) = host.strip_prefix("https://") {
        (true, rest)
    } else {
        (false, host.strip_prefix("http://").unwrap_or(host))
    }
}
