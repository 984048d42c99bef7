//! AI21 Jurassic-2 codec

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{error::Result, messages::Message};

use super::{
    generation_info, prompt::generic_prompt, CallOptions, ContentChoice, ContentResponse,
    ProviderCodec,
};

/// Codec for `ai21.j2-*` models
#[derive(Debug, Clone, Copy, Default)]
pub struct Ai21Codec;

impl ProviderCodec for Ai21Codec {
    fn name(&self) -> &'static str {
        "ai21"
    }

    fn encode(&self, messages: &[Message], options: &CallOptions) -> Result<Vec<u8>> {
        let request = Ai21Request {
            prompt: generic_prompt(messages),
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: options.max_tokens,
            stop_sequences: options.stop_words.clone(),
            count_penalty: Penalty {
                scale: options.repetition_penalty.unwrap_or_default(),
            },
            presence_penalty: Penalty::default(),
            frequency_penalty: Penalty::default(),
        };
        Ok(serde_json::to_vec(&request)?)
    }

    fn decode(&self, body: &[u8]) -> Result<ContentResponse> {
        let output: Ai21Response = serde_json::from_slice(body)?;
        let input_tokens = output.prompt.tokens.len();

        let choices = output
            .completions
            .into_iter()
            .map(|completion| ContentChoice {
                content: completion.data.text,
                stop_reason: completion.finish_reason.reason,
                generation_info: generation_info([
                    ("id", output.id.clone()),
                    ("input_tokens", json!(input_tokens)),
                    ("output_tokens", json!(completion.data.tokens.len())),
                ]),
            })
            .collect();

        Ok(ContentResponse { choices })
    }
}

// AI21 API types

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Ai21Request {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
    count_penalty: Penalty,
    presence_penalty: Penalty,
    frequency_penalty: Penalty,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
struct Penalty {
    scale: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ai21Response {
    /// Documented as a string, observed as a number
    #[serde(default)]
    id: Value,
    #[serde(default)]
    prompt: Ai21Text,
    #[serde(default)]
    completions: Vec<Ai21Completion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Ai21Text {
    #[serde(default)]
    text: String,
    /// Only counted
    #[serde(default)]
    tokens: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ai21Completion {
    data: Ai21Text,
    #[serde(default)]
    finish_reason: Ai21FinishReason,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Ai21FinishReason {
    #[serde(default)]
    reason: String,
}
