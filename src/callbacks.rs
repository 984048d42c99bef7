//! Hooks observing each generation call

use crate::{error::BedrockError, messages::MessageContent, services::ContentResponse};

/// Receives lifecycle events from [`crate::llm::BedrockLlm`]
///
/// All hooks default to no-ops.
pub trait CallbackHandler: Send + Sync {
    fn on_generate_content_start(&self, _messages: &[MessageContent]) {}

    fn on_generate_content_end(&self, _response: &ContentResponse) {}

    fn on_llm_error(&self, _error: &BedrockError) {}
}

/// Logs every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCallbackHandler;

impl CallbackHandler for TracingCallbackHandler {
    fn on_generate_content_start(&self, messages: &[MessageContent]) {
        tracing::info!(messages = messages.len(), "generate content start");
    }

    fn on_generate_content_end(&self, response: &ContentResponse) {
        tracing::info!(choices = response.choices.len(), "generate content end");
    }

    fn on_llm_error(&self, error: &BedrockError) {
        tracing::error!(%error, "generate content failed");
    }
}
