//! Cohere Command codec
//!
//! Reference: <https://docs.aws.amazon.com/bedrock/latest/userguide/model-parameters-cohere-command.html>

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{error::Result, messages::Message};

use super::{
    generation_info, prompt::generic_prompt, CallOptions, ContentChoice, ContentResponse,
    ProviderCodec,
};

/// Codec for `cohere.command-*` models
#[derive(Debug, Clone, Copy, Default)]
pub struct CohereCodec;

impl ProviderCodec for CohereCodec {
    fn name(&self) -> &'static str {
        "cohere"
    }

    fn encode(&self, messages: &[Message], options: &CallOptions) -> Result<Vec<u8>> {
        let request = CohereRequest {
            prompt: generic_prompt(messages),
            temperature: options.temperature,
            p: options.top_p,
            k: options.top_k,
            max_tokens: options.max_tokens,
            stop_sequences: options.stop_words.clone(),
            num_generations: options.candidate_count,
        };
        Ok(serde_json::to_vec(&request)?)
    }

    fn decode(&self, body: &[u8]) -> Result<ContentResponse> {
        let output: CohereResponse = serde_json::from_slice(body)?;

        let choices = output
            .generations
            .into_iter()
            .enumerate()
            .map(|(i, generation)| ContentChoice {
                content: generation.text,
                stop_reason: generation.finish_reason,
                generation_info: generation_info([
                    ("generation_id", json!(generation.id)),
                    ("index", json!(i)),
                ]),
            })
            .collect();

        Ok(ContentResponse { choices })
    }
}

// Cohere API types

#[derive(Debug, Clone, Serialize)]
struct CohereRequest {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_generations: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct CohereResponse {
    #[serde(default)]
    generations: Vec<CohereGeneration>,
}

#[derive(Debug, Clone, Deserialize)]
struct CohereGeneration {
    #[serde(default)]
    id: String,
    #[serde(default)]
    finish_reason: String,
    text: String,
}
