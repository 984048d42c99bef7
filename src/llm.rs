//! High-level model handle: default model, transport and callbacks in one place

use std::sync::Arc;

use crate::{
    callbacks::CallbackHandler,
    config::BedrockConfig,
    error::{BedrockError, Result},
    messages::{flatten_messages, MessageContent},
    services::{BedrockClient, CallOptions, ContentResponse, ModelInvoker, Provider},
};

/// Construction options for [`BedrockLlm`]
#[derive(Default)]
pub struct LlmOptions {
    model_id: Option<String>,
    invoker: Option<Arc<dyn ModelInvoker>>,
    callback: Option<Arc<dyn CallbackHandler>>,
    config: Option<BedrockConfig>,
}

impl LlmOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Model used when call options name none
    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Custom transport instead of the HTTP invoker
    #[must_use]
    pub fn with_invoker(mut self, invoker: Arc<dyn ModelInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    #[must_use]
    pub fn with_callback(mut self, callback: Arc<dyn CallbackHandler>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Explicit configuration instead of the config file and environment
    #[must_use]
    pub fn with_config(mut self, config: BedrockConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Chat model backed by Bedrock `InvokeModel`
pub struct BedrockLlm {
    model_id: String,
    client: BedrockClient,
    callback: Option<Arc<dyn CallbackHandler>>,
}

impl BedrockLlm {
    /// Build a model handle
    ///
    /// Without an explicit config, the config file and environment are read
    /// unless a custom invoker makes the file unnecessary.
    pub fn new(options: LlmOptions) -> Result<Self> {
        Self::build(options, |key| std::env::var(key).ok())
    }

    fn build(options: LlmOptions, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = match options.config {
            Some(config) => config,
            None if options.invoker.is_some() => {
                let mut config = BedrockConfig::default();
                config.apply_env(lookup);
                config
            }
            None => BedrockConfig::load()?,
        };

        let client = match options.invoker {
            Some(invoker) => BedrockClient::new(invoker),
            None => BedrockClient::from_config(&config)?,
        };

        Ok(Self {
            model_id: options.model_id.unwrap_or(config.default_model),
            client,
            callback: options.callback,
        })
    }

    /// Default model id
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Generate choices for a conversation
    pub async fn generate_content(
        &self,
        messages: &[MessageContent],
        options: CallOptions,
    ) -> Result<ContentResponse> {
        if let Some(callback) = &self.callback {
            callback.on_generate_content_start(messages);
        }

        let model_id = options.model.as_deref().unwrap_or(&self.model_id);
        let result = self
            .client
            .create_completion(model_id, &flatten_messages(messages), &options)
            .await;

        if let Some(callback) = &self.callback {
            match &result {
                Ok(response) => callback.on_generate_content_end(response),
                Err(error) => callback.on_llm_error(error),
            }
        }

        result
    }

    /// Send a single human prompt and return the first choice's text
    pub async fn call(&self, prompt: impl Into<String>, options: CallOptions) -> Result<String> {
        let provider = Provider::from_model_id(options.model.as_deref().unwrap_or(&self.model_id))?;
        let response = self
            .generate_content(&[MessageContent::human(prompt)], options)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.content)
            .ok_or_else(|| BedrockError::no_results(provider.as_str()))
    }
}
