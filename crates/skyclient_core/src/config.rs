//! Client configuration: endpoint, region, protocol and log level.
//!
//! # Responsibility
//! - Hold the settings a service client needs before its first request.
//! - Normalize endpoint overrides given as a bare host or a full URL.
//!
//! # Invariants
//! - Endpoint and region are configured before the client is shared;
//!   mutation takes `&mut self`.
//! - A stored endpoint always carries an explicit `http`/`https` scheme.

use crate::logging::{default_log_level, normalize_level};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Region used when the caller configures nothing.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Service endpoint prefix for the identity service.
pub const IDENTITY_SERVICE_ENDPOINT_PREFIX: &str = "cognito-identity";
const DEFAULT_DNS_SUFFIX: &str = "amazonaws.com";
/// Longest region name whose `<region>:<uuid>` resource ids stay within the
/// service's 55-character id limit.
pub const MAX_REGION_LEN: usize = 18;

static REGION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").expect("valid region regex"));

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyEndpoint,
    InvalidEndpoint { endpoint: String, message: String },
    UnsupportedScheme(String),
    InvalidRegion(String),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEndpoint => write!(f, "endpoint cannot be empty"),
            Self::InvalidEndpoint { endpoint, message } => {
                write!(f, "invalid endpoint `{endpoint}`: {message}")
            }
            Self::UnsupportedScheme(scheme) => {
                write!(f, "unsupported endpoint scheme `{scheme}`; expected http|https")
            }
            Self::InvalidRegion(region) => write!(f, "invalid region name `{region}`"),
            Self::InvalidLogLevel(level) => write!(f, "invalid log level `{level}`"),
        }
    }
}

impl Error for ConfigError {}

/// Transport protocol applied to bare-host endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// A normalized service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parses `input` as a bare host (`host[:port]`) or a full URL.
    ///
    /// A bare host gets `default_protocol` as its scheme.
    pub fn parse(input: &str, default_protocol: Protocol) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("{}://{trimmed}", default_protocol.as_str())
        };

        let url = Url::parse(&candidate).map_err(|err| ConfigError::InvalidEndpoint {
            endpoint: trimmed.to_string(),
            message: err.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: trimmed.to_string(),
                message: "missing host".to_string(),
            });
        }

        Ok(Self { url })
    }

    /// Endpoint for the identity service in `region`.
    pub fn for_region(region: &str, protocol: Protocol) -> Result<Self, ConfigError> {
        validate_region(region)?;
        Self::parse(
            &format!("{IDENTITY_SERVICE_ENDPOINT_PREFIX}.{region}.{DEFAULT_DNS_SUFFIX}"),
            protocol,
        )
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // `Url` always renders a trailing slash for an empty path.
        write!(f, "{}", self.url.as_str().trim_end_matches('/'))
    }
}

/// Settings shared by service clients.
///
/// Deserializes from partial documents; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ClientConfiguration {
    /// Explicit endpoint override (bare host or URL).
    pub endpoint: Option<String>,
    pub region: String,
    pub protocol: Protocol,
    pub log_level: String,
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: DEFAULT_REGION.to_string(),
            protocol: Protocol::default(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl ClientConfiguration {
    /// Validates the configuration and resolves the effective endpoint.
    pub fn resolve_endpoint(&self) -> Result<Endpoint, ConfigError> {
        normalize_level(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))?;
        match self.endpoint.as_deref() {
            Some(endpoint) => Endpoint::parse(endpoint, self.protocol),
            None => Endpoint::for_region(&self.region, self.protocol),
        }
    }
}

/// Validates a region name such as `us-east-1` or `ap-southeast-2`.
pub fn validate_region(region: &str) -> Result<(), ConfigError> {
    if region.len() <= MAX_REGION_LEN && REGION_RE.is_match(region) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRegion(region.to_string()))
    }
}
