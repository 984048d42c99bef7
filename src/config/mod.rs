//! Configuration management for bedrock-llm
//!
//! Values are resolved in order:
//! 1. Config file (`<config dir>/bedrock-llm/config.json`, or an explicit path)
//! 2. Environment variables
//! 3. CLI parameters (highest priority, applied by the binary)

pub mod models;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{BedrockError, Result};

/// Shown in place of secret values
pub const REDACTED: &str = "****";

/// Region used when neither the config file nor the environment names one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for the Bedrock runtime endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedrockConfig {
    /// AWS region of the runtime endpoint
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint URL, overriding the regional default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Bedrock API key sent as a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used when call options name none
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Headers added to every request, e.g. externally computed signatures
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_headers: BTreeMap<String, String>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_model() -> String {
    models::DEFAULT_MODEL.to_string()
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            api_key: None,
            default_model: default_model(),
            extra_headers: BTreeMap::new(),
        }
    }
}

impl BedrockConfig {
    /// Load configuration from the default path, then apply environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_path(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Get the configuration directory path
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bedrock-llm")
    }

    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Load configuration from a specific path; a missing file yields defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| BedrockError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| BedrockError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Override fields from environment variables looked up through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(region) = non_empty("AWS_REGION").or_else(|| non_empty("AWS_DEFAULT_REGION")) {
            self.region = region;
        }
        if let Some(endpoint) = non_empty("BEDROCK_ENDPOINT_URL") {
            self.endpoint = Some(endpoint);
        }
        if let Some(api_key) = non_empty("AWS_BEARER_TOKEN_BEDROCK") {
            self.api_key = Some(api_key);
        }
        if let Some(model) = non_empty("BEDROCK_MODEL") {
            self.default_model = model;
        }
    }

    /// Copy safe to display: the API key and every extra header value are masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| REDACTED.to_string()),
            extra_headers: self
                .extra_headers
                .keys()
                .map(|name| (name.clone(), REDACTED.to_string()))
                .collect(),
            ..self.clone()
        }
    }

    /// Get the effective endpoint (custom or regional default)
    #[must_use]
    pub fn effective_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }
}
