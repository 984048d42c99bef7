//! Amazon Titan text codec
//!
//! Reference: <https://docs.aws.amazon.com/bedrock/latest/userguide/model-parameters-titan-text.html>

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::{BedrockError, Result},
    messages::{Message, Role},
};

use super::{generation_info, CallOptions, ContentChoice, ContentResponse, ProviderCodec};

/// Titan completion reasons
pub const COMPLETION_REASON_FINISH: &str = "FINISH";
pub const COMPLETION_REASON_MAX_TOKENS: &str = "LENGTH";
pub const COMPLETION_REASON_CONTENT_FILTERED: &str = "CONTENT_FILTERED";

const PROVIDER: &str = "amazon";

/// Codec for `amazon.titan-*` models
#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonCodec;

impl AmazonCodec {
    /// Titan transcript: `"<Role>: <text>\n"` per text message, ending with a `Bot:` cue
    fn build_input_text(messages: &[Message]) -> Result<String> {
        let mut input = String::new();
        for message in messages.iter().filter(|m| m.is_text()) {
            input.push_str(titan_role(message.role)?);
            input.push_str(": ");
            input.push_str(&message.content);
            input.push('\n');
        }
        input.push_str("\nBot:");
        Ok(input)
    }
}

fn titan_role(role: Role) -> Result<&'static str> {
    match role {
        Role::System => Ok("System"),
        Role::Ai => Ok("Bot"),
        Role::Human | Role::Generic => Ok("User"),
        Role::Function | Role::Tool => Err(BedrockError::unsupported_role(PROVIDER, role)),
    }
}

impl ProviderCodec for AmazonCodec {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn encode(&self, messages: &[Message], options: &CallOptions) -> Result<Vec<u8>> {
        let request = AmazonRequest {
            input_text: Self::build_input_text(messages)?,
            text_generation_config: AmazonGenerationConfig {
                max_token_count: options.max_tokens,
                top_p: options.top_p,
                temperature: options.temperature,
                stop_sequences: options.stop_words.clone(),
            },
        };
        Ok(serde_json::to_vec(&request)?)
    }

    fn decode(&self, body: &[u8]) -> Result<ContentResponse> {
        let output: AmazonResponse = serde_json::from_slice(body)?;
        if output.results.is_empty() {
            return Err(BedrockError::no_results(PROVIDER));
        }

        let choices = output
            .results
            .into_iter()
            .map(|result| ContentChoice {
                content: result.output_text,
                stop_reason: result.completion_reason,
                generation_info: generation_info([
                    ("input_tokens", json!(output.input_text_token_count)),
                    ("output_tokens", json!(result.token_count)),
                ]),
            })
            .collect();

        Ok(ContentResponse { choices })
    }
}

// Titan API types

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmazonRequest {
    input_text: String,
    text_generation_config: AmazonGenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmazonGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_token_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmazonResponse {
    #[serde(default)]
    input_text_token_count: u32,
    #[serde(default)]
    results: Vec<AmazonResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmazonResult {
    #[serde(default)]
    token_count: u32,
    output_text: String,
    #[serde(default)]
    completion_reason: String,
}
