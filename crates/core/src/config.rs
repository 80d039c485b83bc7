//! Service runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! services that need it. Nothing reads the process environment while handling
//! a request. [`ServiceConfig::from_env_values`] takes the raw optional values
//! so it can be exercised without touching the real environment.

use crate::constants::{
    DEFAULT_EXTRACTION_TIMEOUT_SECS, DEFAULT_GEMINI_BASE_URL, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_MODEL_ID, DEFAULT_REST_ADDR,
};
use std::time::Duration;

/// Environment variable holding the extraction collaborator credential.
pub const API_KEY_VAR: &str = "GOOGLE_GEMINI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Raw, unvalidated configuration values as read from the environment.
#[derive(Debug, Default, Clone)]
pub struct EnvValues {
    pub api_key: Option<String>,
    pub model_id: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<String>,
    pub rest_addr: Option<String>,
    pub max_upload_bytes: Option<String>,
}

impl EnvValues {
    /// Read every recognised variable from the process environment.
    pub fn from_process_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            api_key: var(API_KEY_VAR),
            model_id: var("GEMINI_MODEL_ID"),
            base_url: var("GEMINI_BASE_URL"),
            timeout_secs: var("EXTRACTION_TIMEOUT_SECS"),
            rest_addr: var("BLOODWORK_REST_ADDR"),
            max_upload_bytes: var("BLOODWORK_MAX_UPLOAD_BYTES"),
        }
    }
}

/// Configuration resolved at startup.
#[derive(Clone)]
pub struct ServiceConfig {
    api_key: String,
    model_id: String,
    base_url: String,
    extraction_timeout: Duration,
    rest_addr: String,
    max_upload_bytes: usize,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .field("extraction_timeout", &self.extraction_timeout)
            .field("rest_addr", &self.rest_addr)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl ServiceConfig {
    /// Resolve configuration from raw values, applying defaults.
    ///
    /// Blank values count as absent. The API key is mandatory so that a
    /// misconfigured deployment fails at startup rather than on first request.
    pub fn from_env_values(values: EnvValues) -> Result<Self, ConfigError> {
        fn present(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let api_key = present(values.api_key).ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        let timeout_secs = match present(values.timeout_secs) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "EXTRACTION_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => DEFAULT_EXTRACTION_TIMEOUT_SECS,
        };

        let max_upload_bytes = match present(values.max_upload_bytes) {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "BLOODWORK_MAX_UPLOAD_BYTES",
                    value: raw,
                })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            api_key,
            model_id: present(values.model_id).unwrap_or_else(|| DEFAULT_MODEL_ID.into()),
            base_url: present(values.base_url)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
            extraction_timeout: Duration::from_secs(timeout_secs),
            rest_addr: present(values.rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into()),
            max_upload_bytes,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn extraction_timeout(&self) -> Duration {
        self.extraction_timeout
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}
