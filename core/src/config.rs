//! Client configuration.
//!
//! `CreConfig` is fixed for the lifetime of a `CreClient`. Every field has a
//! default so a partially specified configuration (or an empty environment)
//! still produces a usable value; credentials are not validated here and only
//! fail once the upstream rejects a request.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Connection and credential settings for the CRE API.
///
/// `Debug` output masks `client_secret`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CreConfig {
    /// API host without scheme (default: the QA endpoint)
    #[serde(default = "default_host")]
    pub host: String,

    /// API version embedded in every URL as `v{api_version}` (default: 1)
    #[serde(default = "default_api_version")]
    pub api_version: u32,

    /// URL scheme (default: https)
    #[serde(default = "default_protocol")]
    pub protocol: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Identifier of the calling system, sent as `source_system` and
    /// written into organization records.
    #[serde(default)]
    pub source_system: String,

    /// Request timeout in milliseconds (default: 120000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Name reported in request log events (default: cre-client)
    #[serde(default = "default_client_name")]
    pub client_name: String,

    #[serde(skip)]
    pub log: LogConfig,
}

fn default_host() -> String {
    "cre-qa.coursehub.example".to_string()
}

fn default_api_version() -> u32 {
    1
}

fn default_protocol() -> String {
    "https".to_string()
}

fn default_timeout_ms() -> u64 {
    120_000
}

fn default_client_name() -> String {
    "cre-client".to_string()
}

impl Default for CreConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_version: default_api_version(),
            protocol: default_protocol(),
            client_id: String::new(),
            client_secret: String::new(),
            source_system: String::new(),
            timeout_ms: default_timeout_ms(),
            client_name: default_client_name(),
            log: LogConfig::default(),
        }
    }
}

impl fmt::Debug for CreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.client_secret.is_empty() {
            ""
        } else {
            "***"
        };
        f.debug_struct("CreConfig")
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("protocol", &self.protocol)
            .field("client_id", &self.client_id)
            .field("client_secret", &secret)
            .field("source_system", &self.source_system)
            .field("timeout_ms", &self.timeout_ms)
            .field("client_name", &self.client_name)
            .field("log", &self.log)
            .finish()
    }
}

impl CreConfig {
    /// Load configuration from `CRE_`-prefixed environment variables.
    ///
    /// Example: `CRE_HOST`, `CRE_CLIENT_ID`, `CRE_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`CreConfig::from_env`] over an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("CRE_").from_iter(vars)
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Verbosity of the per-request log event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Which parts of a completed request are written to the log event.
///
/// Client name, host, method, status and status text are always included
/// when logging is enabled; the remaining fields are opt-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    pub level: LogLevel,
    pub url: bool,
    pub path: bool,
    pub request_body: bool,
    pub response_body: bool,
}

impl LogConfig {
    /// Logging enabled with every optional field switched on.
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Debug,
            url: true,
            path: true,
            request_body: true,
            response_body: true,
        }
    }
}
