//! bedrock-llm: chat generation over the Amazon Bedrock `InvokeModel` endpoint
//!
//! Callers describe a conversation with vendor-neutral [`MessageContent`]
//! values and [`CallOptions`]. The crate picks the request and response format
//! of the model family named by the model id (AI21, Amazon Titan, Anthropic
//! Claude, Cohere, Meta Llama), performs one invocation, and returns a
//! vendor-neutral [`ContentResponse`].

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod callbacks;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod messages;
pub mod services;

// Re-exports for convenience
pub use callbacks::{CallbackHandler, TracingCallbackHandler};
pub use config::BedrockConfig;
pub use error::{BedrockError, Result};
pub use llm::{BedrockLlm, LlmOptions};
pub use messages::{ContentPart, Message, MessageContent, Role};
pub use services::{BedrockClient, CallOptions, ContentChoice, ContentResponse, FinishReason};
