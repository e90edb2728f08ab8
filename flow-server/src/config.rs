//! Relay configuration, read once from the process environment.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default port for the relay.
pub const DEFAULT_PORT: u16 = 5001;

/// Default code-generation API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model requested from the generation API.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Language used when the upload does not name one.
pub const DEFAULT_LANGUAGE: &str = "Python";

/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Environment variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Parse failure.
        reason: String,
    },
}

/// Runtime configuration of the relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Credential for the generation API.
    pub api_key: Option<String>,
    /// Base URL of the generation API, without a trailing slash.
    pub api_base_url: String,
    /// Model requested from the generation API.
    pub model: String,
    /// Language used when an upload omits one.
    pub default_language: String,
    /// Directory for staged uploads.
    pub upload_dir: PathBuf,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            upload_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl RelayConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `HOST` | `127.0.0.1` |
    /// | `PORT` | `5001` |
    /// | `OPENAI_API_KEY` | unset |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL` | `gpt-4o` |
    /// | `FLOW2CODE_DEFAULT_LANGUAGE` | `Python` |
    /// | `FLOW2CODE_UPLOAD_DIR` | OS temp dir |
    /// | `FLOW2CODE_MAX_UPLOAD_BYTES` | 10 MiB |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a set variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = parse("HOST", &host)?;
        }
        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port)?;
        }
        config.api_key = get("OPENAI_API_KEY");
        if let Some(base) = get("OPENAI_BASE_URL") {
            let url: Url = parse("OPENAI_BASE_URL", &base)?;
            config.api_base_url = url.as_str().trim_end_matches('/').to_string();
        }
        if let Some(model) = get("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(language) = get("FLOW2CODE_DEFAULT_LANGUAGE") {
            config.default_language = language;
        }
        if let Some(dir) = get("FLOW2CODE_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(limit) = get("FLOW2CODE_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse("FLOW2CODE_MAX_UPLOAD_BYTES", &limit)?;
        }

        Ok(config)
    }

    /// Whether a generation API credential is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
