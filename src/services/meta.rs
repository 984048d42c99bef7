//! Meta Llama codec

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{error::Result, messages::Message};

use super::{
    generation_info, prompt::generic_prompt, CallOptions, ContentChoice, ContentResponse,
    ProviderCodec,
};

/// Codec for `meta.llama*` models
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaCodec;

impl ProviderCodec for MetaCodec {
    fn name(&self) -> &'static str {
        "meta"
    }

    fn encode(&self, messages: &[Message], options: &CallOptions) -> Result<Vec<u8>> {
        let request = MetaRequest {
            prompt: generic_prompt(messages),
            temperature: options.temperature,
            top_p: options.top_p,
            max_gen_len: options.max_tokens,
        };
        Ok(serde_json::to_vec(&request)?)
    }

    fn decode(&self, body: &[u8]) -> Result<ContentResponse> {
        let output: MetaResponse = serde_json::from_slice(body)?;

        Ok(ContentResponse {
            choices: vec![ContentChoice {
                content: output.generation,
                stop_reason: output.stop_reason,
                generation_info: generation_info([
                    ("input_tokens", json!(output.prompt_token_count)),
                    ("output_tokens", json!(output.generation_token_count)),
                ]),
            }],
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct MetaRequest {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_gen_len: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct MetaResponse {
    generation: String,
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    generation_token_count: u32,
    #[serde(default)]
    stop_reason: String,
}
