//! Service layer translating between neutral messages and Bedrock vendor formats
//!
//! This module provides codecs for each model family hosted on Bedrock:
//! - AI21 Jurassic
//! - Amazon Titan
//! - Anthropic Claude
//! - Cohere Command
//! - Meta Llama
//!
//! [`client::BedrockClient`] picks the codec from the model id and sends the
//! encoded body through a [`invoker::ModelInvoker`].

pub mod ai21;
pub mod amazon;
pub mod anthropic;
pub mod client;
pub mod cohere;
pub mod invoker;
pub mod meta;
pub mod prompt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::Result, messages::Message};

pub use self::{
    client::{BedrockClient, Provider},
    invoker::{HttpInvoker, InvokeModelRequest, ModelInvoker},
};

/// Generation options for a single model call
///
/// Every field is optional. Codecs omit unset values so the vendor default applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallOptions {
    /// Model id overriding the client default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Top-p for nucleus sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Top-k sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,

    /// Number of candidates to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,

    /// Repetition penalty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
}

impl CallOptions {
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub const fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    #[must_use]
    pub const fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn with_stop_words(mut self, stop_words: Vec<String>) -> Self {
        self.stop_words = Some(stop_words);
        self
    }

    #[must_use]
    pub const fn with_candidate_count(mut self, candidate_count: u32) -> Self {
        self.candidate_count = Some(candidate_count);
        self
    }

    #[must_use]
    pub const fn with_repetition_penalty(mut self, penalty: f64) -> Self {
        self.repetition_penalty = Some(penalty);
        self
    }
}

/// Normalized stop reason across vendors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of turn or a stop sequence was hit
    Stop,
    /// Token limit reached
    Length,
    /// Output withheld by a content filter
    ContentFilter,
    Other(String),
}

impl FinishReason {
    /// Map a raw vendor stop reason
    #[must_use]
    pub fn from_vendor(reason: &str) -> Self {
        match reason {
            "end_turn" | "stop_sequence" | "stop" | "endoftext" | "FINISH" | "COMPLETE" => {
                Self::Stop
            }
            "max_tokens" | "length" | "LENGTH" | "MAX_TOKENS" => Self::Length,
            "CONTENT_FILTERED" | "ERROR_TOXIC" => Self::ContentFilter,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One generated candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentChoice {
    pub content: String,
    /// Raw vendor stop reason
    pub stop_reason: String,
    /// Vendor-specific extras such as token counts
    #[serde(default)]
    pub generation_info: Map<String, Value>,
}

impl ContentChoice {
    /// Normalized form of [`ContentChoice::stop_reason`]
    #[must_use]
    pub fn finish_reason(&self) -> FinishReason {
        FinishReason::from_vendor(&self.stop_reason)
    }
}

/// Response from a generation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentResponse {
    pub choices: Vec<ContentChoice>,
}

/// Request/response mapping for one model family
pub trait ProviderCodec: Send + Sync {
    /// Vendor name used in logs and errors
    fn name(&self) -> &'static str;

    /// Build the vendor JSON request body
    fn encode(&self, messages: &[Message], options: &CallOptions) -> Result<Vec<u8>>;

    /// Parse the vendor JSON response body
    fn decode(&self, body: &[u8]) -> Result<ContentResponse>;
}

/// Build a `generation_info` map from key/value pairs
pub(crate) fn generation_info<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
