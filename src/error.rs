//! Error types for bedrock-llm

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`BedrockError`]
pub type Result<T> = std::result::Result<T, BedrockError>;

/// Main error type for bedrock-llm
#[derive(Debug, Error)]
pub enum BedrockError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The model id does not belong to a supported vendor
    #[error("Unsupported provider for model: {model_id}")]
    UnsupportedProvider { model_id: String },

    /// A message role the vendor has no equivalent for
    #[error("Role not supported by {provider}: {role}")]
    UnsupportedRole { provider: String, role: String },

    /// More than one system message was supplied to a vendor that takes a single system prompt
    #[error("multiple system prompts")]
    MultipleSystemPrompts,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The vendor returned no generations
    #[error("no results from {provider}")]
    NoResults { provider: String },

    /// The generation stopped before completing its turn
    #[error("completed due to {stop_reason}. Maybe try increasing max tokens")]
    Incomplete { stop_reason: String },

    /// Request throttled by the endpoint
    #[error("Throttled: {0}")]
    Throttled(String),

    /// Credentials rejected by the endpoint
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Error response from the endpoint
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        error_type: Option<String>,
    },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BedrockError {
    /// Shorthand for [`BedrockError::NoResults`]
    pub(crate) fn no_results(provider: &str) -> Self {
        Self::NoResults {
            provider: provider.to_string(),
        }
    }

    /// Shorthand for [`BedrockError::UnsupportedRole`]
    pub(crate) fn unsupported_role(provider: &str, role: impl std::fmt::Display) -> Self {
        Self::UnsupportedRole {
            provider: provider.to_string(),
            role: role.to_string(),
        }
    }
}
