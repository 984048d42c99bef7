//! Provider dispatch: model id → codec → invoke → neutral response

use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    config::BedrockConfig,
    error::{BedrockError, Result},
    messages::Message,
};

use super::{
    ai21::Ai21Codec, amazon::AmazonCodec, anthropic::AnthropicCodec, cohere::CohereCodec,
    invoker::{HttpInvoker, InvokeModelRequest, ModelInvoker},
    meta::MetaCodec,
    CallOptions, ContentResponse, ProviderCodec,
};

/// Prefixes of cross-region inference profile ids, e.g. `us.anthropic.claude-3-haiku-...`
const INFERENCE_PROFILE_PREFIXES: &[&str] = &["us", "eu", "apac", "us-gov", "global"];

/// Model families served through `InvokeModel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Ai21,
    Amazon,
    Anthropic,
    Cohere,
    Meta,
}

impl Provider {
    /// Resolve the provider from the vendor prefix of a model id
    pub fn from_model_id(model_id: &str) -> Result<Self> {
        let mut segments = model_id.split('.');
        let mut vendor = segments.next().unwrap_or_default();
        if INFERENCE_PROFILE_PREFIXES.contains(&vendor) {
            vendor = segments.next().unwrap_or_default();
        }

        vendor
            .parse()
            .map_err(|()| BedrockError::UnsupportedProvider {
                model_id: model_id.to_string(),
            })
    }

    /// Codec for this provider's request/response format
    #[must_use]
    pub fn codec(&self) -> &'static dyn ProviderCodec {
        match self {
            Self::Ai21 => &Ai21Codec,
            Self::Amazon => &AmazonCodec,
            Self::Anthropic => &AnthropicCodec,
            Self::Cohere => &CohereCodec,
            Self::Meta => &MetaCodec,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ai21 => "ai21",
            Self::Amazon => "amazon",
            Self::Anthropic => "anthropic",
            Self::Cohere => "cohere",
            Self::Meta => "meta",
        }
    }
}

impl FromStr for Provider {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ai21" => Ok(Self::Ai21),
            "amazon" => Ok(Self::Amazon),
            "anthropic" => Ok(Self::Anthropic),
            "cohere" => Ok(Self::Cohere),
            "meta" => Ok(Self::Meta),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client performing one `InvokeModel` round trip per completion
#[derive(Clone)]
pub struct BedrockClient {
    invoker: Arc<dyn ModelInvoker>,
}

impl BedrockClient {
    /// Create a client over any transport
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self { invoker }
    }

    /// Create a client backed by [`HttpInvoker`]
    pub fn from_config(config: &BedrockConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpInvoker::new(config)?)))
    }

    /// Encode `messages` for the model's vendor, invoke it, and decode the reply
    pub async fn create_completion(
        &self,
        model_id: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<ContentResponse> {
        let provider = Provider::from_model_id(model_id)?;
        let codec = provider.codec();
        tracing::debug!(%model_id, provider = codec.name(), messages = messages.len(), "dispatching completion");

        let body = codec.encode(messages, options)?;
        let response = self
            .invoker
            .invoke_model(InvokeModelRequest::json(model_id, body))
            .await?;

        codec.decode(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Role;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Records requests and replies with a canned body
    struct StubInvoker {
        reply: &'static str,
        seen: Mutex<Vec<InvokeModelRequest>>,
    }

    #[async_trait]
    impl ModelInvoker for StubInvoker {
        async fn invoke_model(&self, request: InvokeModelRequest) -> Result<Bytes> {
            self.seen.lock().unwrap().push(request);
            Ok(Bytes::from_static(self.reply.as_bytes()))
        }
    }

    #[test]
    fn test_provider_from_model_id() {
        assert_eq!(Provider::from_model_id("ai21.j2-mid-v1").unwrap(), Provider::Ai21);
        assert_eq!(
            Provider::from_model_id("amazon.titan-text-lite-v1").unwrap(),
            Provider::Amazon
        );
        assert_eq!(
            Provider::from_model_id("us.anthropic.claude-3-haiku-20240307-v1:0").unwrap(),
            Provider::Anthropic
        );
        assert_eq!(
            Provider::from_model_id("cohere.command-text-v14").unwrap(),
            Provider::Cohere
        );
        assert_eq!(
            Provider::from_model_id("meta.llama2-70b-chat-v1").unwrap(),
            Provider::Meta
        );
    }

    #[test]
    fn test_inference_profile_prefixes() {
        let cases = [
            ("us.anthropic.claude-3-haiku-20240307-v1:0", Provider::Anthropic),
            ("eu.anthropic.claude-3-sonnet-20240229-v1:0", Provider::Anthropic),
            ("apac.amazon.titan-text-express-v1", Provider::Amazon),
            ("us-gov.meta.llama2-13b-chat-v1", Provider::Meta),
            ("global.anthropic.claude-3-haiku-20240307-v1:0", Provider::Anthropic),
        ];

        for (model_id, provider) in cases {
            assert_eq!(Provider::from_model_id(model_id).unwrap(), provider, "{model_id}");
        }
    }

    #[test]
    fn test_unknown_provider() {
        for model_id in ["mistral.mistral-7b-instruct-v0:2", "", "us."] {
            assert!(matches!(
                Provider::from_model_id(model_id),
                Err(BedrockError::UnsupportedProvider { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_create_completion_dispatches_to_codec() {
        let stub = Arc::new(StubInvoker {
            reply: r#"{"generation":"Hi","prompt_token_count":5,"generation_token_count":1,"stop_reason":"stop"}"#,
            seen: Mutex::new(Vec::new()),
        });
        let client = BedrockClient::new(stub.clone());

        let response = client
            .create_completion(
                "meta.llama2-13b-chat-v1",
                &[Message::text(Role::Human, "Hello")],
                &CallOptions::default().with_temperature(0.1),
            )
            .await
            .unwrap();

        assert_eq!(response.choices[0].content, "Hi");

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model_id, "meta.llama2-13b-chat-v1");
        let body: serde_json::Value = serde_json::from_slice(&seen[0].body).unwrap();
        assert_eq!(body["prompt"], "\nhuman: Hello\nAI: ");
        assert_eq!(body["temperature"], 0.1);
    }

    #[tokio::test]
    async fn test_unsupported_provider_skips_invocation() {
        let stub = Arc::new(StubInvoker {
            reply: "{}",
            seen: Mutex::new(Vec::new()),
        });
        let client = BedrockClient::new(stub.clone());

        let err = client
            .create_completion("stability.sd3", &[], &CallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, BedrockError::UnsupportedProvider { .. }));
        assert!(stub.seen.lock().unwrap().is_empty());
    }
}
