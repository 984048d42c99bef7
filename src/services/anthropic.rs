//! Anthropic Claude codec (Messages API on Bedrock)
//!
//! Reference: <https://docs.aws.amazon.com/bedrock/latest/userguide/model-parameters-anthropic-claude-messages.html>

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::{BedrockError, Result},
    messages::{Message, MessageKind, Role},
};

use super::{generation_info, CallOptions, ContentChoice, ContentResponse, ProviderCodec};

/// Stop reasons reported by Claude
pub const STOP_REASON_END_TURN: &str = "end_turn";
pub const STOP_REASON_MAX_TOKENS: &str = "max_tokens";
pub const STOP_REASON_STOP_SEQUENCE: &str = "stop_sequence";

/// `anthropic_version` Bedrock expects in every request
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Used when the caller leaves `max_tokens` unset; Claude requires a value
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

const PROVIDER: &str = "anthropic";

/// Codec for `anthropic.claude-*` models
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicCodec;

/// Claude-side role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnthropicRole {
    System,
    User,
    Assistant,
}

fn anthropic_role(role: Role) -> Result<AnthropicRole> {
    match role {
        Role::System => Ok(AnthropicRole::System),
        Role::Ai | Role::Function => Ok(AnthropicRole::Assistant),
        Role::Human | Role::Generic => Ok(AnthropicRole::User),
        Role::Tool => Err(BedrockError::unsupported_role(PROVIDER, role)),
    }
}

impl AnthropicCodec {
    /// Split out the system prompt and group consecutive same-role parts into turns
    fn convert_messages(
        messages: &[Message],
    ) -> Result<(Option<String>, Vec<AnthropicMessage>)> {
        let mut system: Option<String> = None;
        let mut turns: Vec<AnthropicMessage> = Vec::with_capacity(messages.len());

        for message in messages {
            let role = match anthropic_role(message.role)? {
                AnthropicRole::System => {
                    if system.is_some() {
                        return Err(BedrockError::MultipleSystemPrompts);
                    }
                    if !message.is_text() {
                        return Err(BedrockError::InvalidInput(
                            "system prompt must be text".to_string(),
                        ));
                    }
                    system = Some(message.content.clone());
                    continue;
                }
                AnthropicRole::User => "user",
                AnthropicRole::Assistant => "assistant",
            };

            let block = Self::convert_content(message);
            match turns.last_mut() {
                Some(last) if last.role == role => last.content.push(block),
                _ => turns.push(AnthropicMessage {
                    role,
                    content: vec![block],
                }),
            }
        }

        Ok((system, turns))
    }

    fn convert_content(message: &Message) -> AnthropicContent {
        match message.kind {
            MessageKind::Text => AnthropicContent::Text {
                text: message.content.clone(),
            },
            MessageKind::Image => AnthropicContent::Image {
                source: AnthropicImageSource {
                    source_type: "base64",
                    media_type: message.mime_type.clone().unwrap_or_default(),
                    data: message.content.clone(),
                },
            },
        }
    }
}

impl ProviderCodec for AnthropicCodec {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn encode(&self, messages: &[Message], options: &CallOptions) -> Result<Vec<u8>> {
        let (system, messages) = Self::convert_messages(messages)?;
        let request = AnthropicRequest {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system,
            messages,
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            stop_sequences: options.stop_words.clone(),
        };
        Ok(serde_json::to_vec(&request)?)
    }

    fn decode(&self, body: &[u8]) -> Result<ContentResponse> {
        let output: AnthropicResponse = serde_json::from_slice(body)?;

        if output.content.is_empty() {
            return Err(BedrockError::no_results(PROVIDER));
        }
        let stop_reason = output.stop_reason.unwrap_or_default();
        if stop_reason != STOP_REASON_END_TURN && stop_reason != STOP_REASON_STOP_SEQUENCE {
            return Err(BedrockError::Incomplete { stop_reason });
        }

        let choices = output
            .content
            .into_iter()
            .map(|block| ContentChoice {
                content: block.text,
                stop_reason: stop_reason.clone(),
                generation_info: generation_info([
                    ("input_tokens", json!(output.usage.input_tokens)),
                    ("output_tokens", json!(output.usage.output_tokens)),
                ]),
            })
            .collect();

        Ok(ContentResponse { choices })
    }
}

// Anthropic API types

#[derive(Debug, Clone, Serialize)]
struct AnthropicRequest {
    anthropic_version: &'static str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContent {
    Text { text: String },
    Image { source: AnthropicImageSource },
}

#[derive(Debug, Clone, Serialize)]
struct AnthropicImageSource {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: String,
    data: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicResponseBlock>,
    stop_reason: Option<String>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponseBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}
