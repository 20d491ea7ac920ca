//! Client identity resolution
//!
//! Picks the client id sent to the upload service and embedded in CDN URLs.
//! An explicit value always wins; otherwise an ordered list of configuration
//! sources is consulted. Sources are read on every call, never cached.

use crate::{Error, Result};

/// Primary configuration variable named in resolution errors.
pub const PRIMARY_CLIENT_ID_VAR: &str = "BLOBBER_CLIENT_ID";

/// Variables consulted by [`ClientIdResolver::default`], in order.
pub const DEFAULT_CLIENT_ID_VARS: [&str; 3] = [
    PRIMARY_CLIENT_ID_VAR,
    "REACT_APP_BLOBBER_CLIENT_ID",
    "NEXT_PUBLIC_BLOBBER_CLIENT_ID",
];

/// One candidate location for the client id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIdSource {
    /// Process environment variable, read at lookup time.
    Env(String),
    /// Value supplied directly by the composition root.
    Fixed { name: String, value: Option<String> },
}

impl ClientIdSource {
    pub fn env(name: impl Into<String>) -> Self {
        ClientIdSource::Env(name.into())
    }

    pub fn fixed(name: impl Into<String>, value: Option<&str>) -> Self {
        ClientIdSource::Fixed {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ClientIdSource::Env(name) => name,
            ClientIdSource::Fixed { name, .. } => name,
        }
    }

    /// Current non-empty value of this source, if any.
    pub fn lookup(&self) -> Option<String> {
        let value = match self {
            ClientIdSource::Env(name) => std::env::var(name).ok(),
            ClientIdSource::Fixed { value, .. } => value.clone(),
        };
        value.filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdResolver {
    sources: Vec<ClientIdSource>,
}

impl Default for ClientIdResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_CLIENT_ID_VARS
                .iter()
                .map(|name| ClientIdSource::env(*name))
                .collect(),
        )
    }
}

impl ClientIdResolver {
    pub fn new(sources: Vec<ClientIdSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[ClientIdSource] {
        &self.sources
    }

    /// Resolve the client id for `operation`, which is named in the error message.
    pub fn resolve(&self, explicit: Option<&str>, operation: &str) -> Result<String> {
        if let Some(id) = explicit.filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }

        for source in &self.sources {
            if let Some(id) = source.lookup() {
                tracing::debug!("Resolved client id from {}", source.name());
                return Ok(id);
            }
        }

        Err(Error::Configuration(format!(
            "{op}: Blobber Client ID not found. Pass clientId property to {op} config, or provide {var} environment variable.",
            op = operation,
            var = PRIMARY_CLIENT_ID_VAR
        )))
    }
}
