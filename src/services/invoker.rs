//! Transport for the Bedrock `InvokeModel` endpoint
//!
//! Request signing is out of scope here: [`HttpInvoker`] sends a bearer token
//! (Bedrock API keys) and any pre-computed headers from [`BedrockConfig`].

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client};

use crate::{
    config::BedrockConfig,
    error::{BedrockError, Result},
};

/// A single `InvokeModel` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeModelRequest {
    pub model_id: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub accept: String,
}

impl InvokeModelRequest {
    /// JSON request accepting any response type
    #[must_use]
    pub fn json(model_id: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            model_id: model_id.into(),
            body,
            content_type: "application/json".to_string(),
            accept: "*/*".to_string(),
        }
    }
}

/// Sends encoded bodies to the inference endpoint and returns the raw response body
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<Bytes>;
}

/// `InvokeModel` over HTTPS with reqwest
pub struct HttpInvoker {
    client: Client,
    endpoint: String,
}

impl HttpInvoker {
    /// Create an invoker from configuration
    pub fn new(config: &BedrockConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();

        if let Some(api_key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
                    BedrockError::InvalidConfig("Invalid API key format".to_string())
                })?,
            );
        }

        for (name, value) in &config.extra_headers {
            let name = header::HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                BedrockError::InvalidConfig(format!("Invalid header name: {name}"))
            })?;
            let value = header::HeaderValue::from_str(value).map_err(|_| {
                BedrockError::InvalidConfig(format!("Invalid value for header {}", name.as_str()))
            })?;
            headers.insert(name, value);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: config.effective_endpoint(),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn invoke_url(&self, model_id: &str) -> String {
        format!(
            "{}/model/{}/invoke",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(model_id)
        )
    }
}

#[async_trait]
impl ModelInvoker for HttpInvoker {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<Bytes> {
        let url = self.invoke_url(&request.model_id);
        tracing::debug!(
            model_id = %request.model_id,
            bytes = request.body.len(),
            "invoking model"
        );

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, request.content_type)
            .header(header::ACCEPT, request.accept)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            tracing::warn!(status = status.as_u16(), "model invocation failed");
            return Err(classify_error(status.as_u16(), &error_text));
        }

        let body = response.bytes().await?;
        tracing::debug!(bytes = body.len(), "model responded");
        Ok(body)
    }
}

/// Map a Bedrock error response (`{"message": ..., "__type": ...}`) to an error variant
#[must_use]
pub fn classify_error(status: u16, body_text: &str) -> BedrockError {
    let json = serde_json::from_str::<serde_json::Value>(body_text).ok();

    let message = json
        .as_ref()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(|m| m.as_str())
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| body_text.trim().to_string());

    let error_type = json
        .as_ref()
        .and_then(|v| v.get("__type"))
        .and_then(|t| t.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let throttled = error_type
        .as_deref()
        .is_some_and(|t| t.to_lowercase().contains("throttl"))
        || message.to_lowercase().contains("throttl");

    match status {
        429 => BedrockError::Throttled(message),
        _ if throttled => BedrockError::Throttled(message),
        401 | 403 => BedrockError::Unauthorized(message),
        404 => BedrockError::ModelNotFound(message),
        400 | 413 | 415 => BedrockError::InvalidInput(message),
        _ => BedrockError::Api {
            status,
            message,
            error_type,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_url_encodes_model_id() {
        let config = BedrockConfig {
            endpoint: Some("http://localhost:9000/".into()),
            ..BedrockConfig::default()
        };
        let invoker = HttpInvoker::new(&config).unwrap();
        assert_eq!(
            invoker.invoke_url("anthropic.claude-3-haiku-20240307-v1:0"),
            "http://localhost:9000/model/anthropic.claude-3-haiku-20240307-v1%3A0/invoke"
        );
    }

    #[test]
    fn test_json_request_headers() {
        let request = InvokeModelRequest::json("meta.llama2-13b-chat-v1", b"{}".to_vec());
        assert_eq!(request.content_type, "application/json");
        assert_eq!(request.accept, "*/*");
    }

    #[test]
    fn test_classify_error() {
        let body = r#"{"message":"Too many requests, please wait.","__type":"ThrottlingException"}"#;
        assert!(matches!(classify_error(400, body), BedrockError::Throttled(_)));
        assert!(matches!(
            classify_error(403, r#"{"message":"denied"}"#),
            BedrockError::Unauthorized(m) if m == "denied"
        ));
        assert!(matches!(
            classify_error(404, "no such model"),
            BedrockError::ModelNotFound(m) if m == "no such model"
        ));
        assert!(matches!(
            classify_error(400, r#"{"message":"bad field"}"#),
            BedrockError::InvalidInput(_)
        ));

        match classify_error(
            500,
            r#"{"message":"boom","__type":"InternalServerException"}"#,
        ) {
            BedrockError::Api {
                status,
                message,
                error_type,
            } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
                assert_eq!(error_type.as_deref(), Some("InternalServerException"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let config = BedrockConfig {
            api_key: Some("bad\nkey".into()),
            ..BedrockConfig::default()
        };
        assert!(matches!(
            HttpInvoker::new(&config),
            Err(BedrockError::InvalidConfig(_))
        ));
    }
}
