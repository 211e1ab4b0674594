//! Configuration for the nrtsearch tools.
//!
//! # Example
//!
//! ```
//! use nrtsearch_mcp::NrtsearchConfig;
//!
//! // Minimal config (uses defaults)
//! let config = NrtsearchConfig::default();
//! assert_eq!(config.base_url(), "http://localhost:6000");
//!
//! // Full config
//! let config = NrtsearchConfig {
//!     host: "search.internal".into(),
//!     port: 6443,
//!     use_tls: true,
//!     request_timeout_ms: Some(5_000),
//!     ..Default::default()
//! };
//! assert_eq!(config.base_url(), "https://search.internal:6443");
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration for the nrtsearch tools.
///
/// All fields have defaults matching a local nrtsearch deployment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NrtsearchConfig {
    /// nrtsearch gateway host
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of the HTTP/JSON gateway listener, not the gRPC port. The
    /// default assumes the gateway is exposed on 6000.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Use https instead of http
    #[serde(default)]
    pub use_tls: bool,

    /// Per-request timeout; `None` waits for the backend indefinitely
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// Hit count used when a search call omits `size`
    #[serde(default = "default_top_hits")]
    pub default_top_hits: i32,
}

fn default_host() -> String { "localhost".to_string() }
fn default_port() -> u16 { 6000 }
fn default_top_hits() -> i32 { 10 }

impl Default for NrtsearchConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            use_tls: false,
            request_timeout_ms: None,
            default_top_hits: default_top_hits(),
        }
    }
}

impl NrtsearchConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
