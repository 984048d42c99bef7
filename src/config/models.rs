//! Bedrock model identifiers

pub const AI21_J2_MID_V1: &str = "ai21.j2-mid-v1";
pub const AI21_J2_ULTRA_V1: &str = "ai21.j2-ultra-v1";

pub const AMAZON_TITAN_TEXT_LITE_V1: &str = "amazon.titan-text-lite-v1";
pub const AMAZON_TITAN_TEXT_EXPRESS_V1: &str = "amazon.titan-text-express-v1";

pub const ANTHROPIC_CLAUDE_V2: &str = "anthropic.claude-v2";
pub const ANTHROPIC_CLAUDE_V2_1: &str = "anthropic.claude-v2:1";
pub const ANTHROPIC_CLAUDE_INSTANT_V1: &str = "anthropic.claude-instant-v1";
pub const ANTHROPIC_CLAUDE_3_SONNET: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const ANTHROPIC_CLAUDE_3_HAIKU: &str = "anthropic.claude-3-haiku-20240307-v1:0";

pub const COHERE_COMMAND_TEXT_V14: &str = "cohere.command-text-v14";
pub const COHERE_COMMAND_LIGHT_TEXT_V14: &str = "cohere.command-light-text-v14";

pub const META_LLAMA2_13B_CHAT_V1: &str = "meta.llama2-13b-chat-v1";
pub const META_LLAMA2_70B_CHAT_V1: &str = "meta.llama2-70b-chat-v1";

/// Model used when nothing else is configured
pub const DEFAULT_MODEL: &str = AMAZON_TITAN_TEXT_LITE_V1;
