//! Configuration structures for deeplink clients.
//!
//! This module provides the client identity and web fallback settings a host
//! application supplies before attaching deeplink behavior.

use crate::Error;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

/// Default host serving the web sign-up fallback.
pub const DEFAULT_WEB_HOST: &str = "m.uber.com";

/// Configuration for a deeplink client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RidesConfig {
    /// Registered client id
    #[validate(custom(function = "validate_client_id"))]
    pub client_id: String,

    /// Host serving the web sign-up fallback
    #[validate(custom(function = "validate_web_host"))]
    #[serde(default = "default_web_host")]
    pub web_host: String,

    /// SDK version reported in the user-agent tag
    #[validate(length(min = 1))]
    #[serde(default = "default_sdk_version")]
    pub sdk_version: String,
}

fn default_web_host() -> String {
    DEFAULT_WEB_HOST.to_string()
}

fn default_sdk_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn validate_client_id(client_id: &str) -> Result<(), ValidationError> {
    if client_id.trim().is_empty() {
        return Err(ValidationError::new("missing_client_id"));
    }
    Ok(())
}

fn validate_web_host(host: &str) -> Result<(), ValidationError> {
    match Url::parse(&format!("https://{host}/")) {
        Ok(url) if url.host_str() == Some(host) => Ok(()),
        _ => Err(ValidationError::new("invalid_web_host")),
    }
}

impl RidesConfig {
    /// Create a new configuration for the given client id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingClientId`] if the client id is empty.
    pub fn new(client_id: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            client_id: client_id.into(),
            web_host: default_web_host(),
            sdk_version: default_sdk_version(),
        };

        config.check()?;
        Ok(config)
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or validation fails.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Set the web fallback host.
    #[must_use]
    pub fn with_web_host(mut self, host: impl Into<String>) -> Self {
        self.web_host = host.into();
        self
    }

    /// Set the SDK version reported in the user-agent tag.
    #[must_use]
    pub fn with_sdk_version(mut self, version: impl Into<String>) -> Self {
        self.sdk_version = version.into();
        self
    }

    /// Validate the configuration, reporting a missing client id distinctly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingClientId`] for an empty client id and
    /// [`Error::ConfigError`] for any other invalid field.
    pub fn check(&self) -> Result<(), Error> {
        if validate_client_id(&self.client_id).is_err() {
            return Err(Error::MissingClientId);
        }

        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Build the web sign-up fallback URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the web host does not form a valid URL.
    pub fn fallback_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("https://{}/sign-up", self.web_host))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id);
        Ok(url)
    }
}
