use crate::reading::Source;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SERVICE_NAME: &str = "aggregator";
const DEFAULT_ROCK_URL: &str = "http://localhost:3001";
const DEFAULT_PAPER_URL: &str = "http://localhost:3002";
const DEFAULT_SCISSOR_URL: &str = "http://localhost:3003";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Service name cannot be empty")]
    EmptyServiceName,

    #[error("Upstream timeout cannot be 0")]
    InvalidTimeout,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Invalid URL for {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        source: url::ParseError,
    },

    #[error("Unsupported scheme for {0} upstream: {1}")]
    UnsupportedScheme(Source, String),
}

/// Aggregator configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for incoming requests
    #[serde(default)]
    pub listener: Listener,
    /// Name reported by the health endpoints
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Base URLs of the three upstreams
    pub upstreams: Upstreams,
    /// Per-upstream deadline for a complete request/response cycle
    ///
    /// Unset means an aggregate request waits on its upstreams indefinitely.
    #[serde(default)]
    pub upstream_timeout_secs: Option<u64>,
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.into()
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a key lookup, falling back to defaults
    /// for every absent key.
    ///
    /// Recognised keys: `HOST`, `PORT`, `SERVICE_NAME`, `ROCK_SERVICE_URL`,
    /// `PAPER_SERVICE_URL`, `SCISSOR_SERVICE_URL`, `UPSTREAM_TIMEOUT_SECS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => parse_number("PORT", value)?,
            None => DEFAULT_PORT,
        };

        let upstream_timeout_secs = lookup("UPSTREAM_TIMEOUT_SECS")
            .map(|value| parse_number("UPSTREAM_TIMEOUT_SECS", value))
            .transpose()?;

        let url = |key: &'static str, default: &str| {
            let value = lookup(key).unwrap_or_else(|| default.to_string());
            Url::parse(&value).map_err(|source| ValidationError::InvalidUrl { key, source })
        };

        let config = Config {
            listener: Listener {
                host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
                port,
            },
            service_name: lookup("SERVICE_NAME").unwrap_or_else(default_service_name),
            upstreams: Upstreams {
                rock: url("ROCK_SERVICE_URL", DEFAULT_ROCK_URL)?,
                paper: url("PAPER_SERVICE_URL", DEFAULT_PAPER_URL)?,
                scissor: url("SCISSOR_SERVICE_URL", DEFAULT_SCISSOR_URL)?,
            },
            upstream_timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the aggregator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;

        if self.service_name.is_empty() {
            return Err(ValidationError::EmptyServiceName);
        }

        if self.upstream_timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }

        for source in Source::ALL {
            let scheme = self.upstreams.get(source).scheme();
            if scheme != "http" && scheme != "https" {
                return Err(ValidationError::UnsupportedScheme(source, scheme.into()));
            }
        }

        Ok(())
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    value: String,
) -> Result<T, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber { key, value })
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl Listener {
    /// Validates the listener configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Base URLs of the upstream random number services
///
/// Note: Uses the `url::Url` type so invalid URLs are rejected during config
/// deserialization.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Upstreams {
    pub rock: Url,
    pub paper: Url,
    pub scissor: Url,
}

impl Upstreams {
    pub fn get(&self, source: Source) -> &Url {
        match source {
            Source::Rock => &self.rock,
            Source::Paper => &self.paper,
            Source::Scissor => &self.scissor,
        }
    }
}
