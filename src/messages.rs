//! Message types for chat generation
//!
//! Callers build [`MessageContent`] values: a role plus one or more text or
//! image parts. Codecs consume the flattened [`Message`] form, one entry per
//! part, produced by [`flatten_messages`].

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Ai,
    Generic,
    Function,
    Tool,
}

impl Role {
    /// Canonical lowercase name, used verbatim in role-prefixed prompts
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Human => "human",
            Self::Ai => "ai",
            Self::Generic => "generic",
            Self::Function => "function",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "human" | "user" => Ok(Self::Human),
            "ai" | "assistant" => Ok(Self::Ai),
            "generic" => Ok(Self::Generic),
            "function" => Ok(Self::Function),
            "tool" => Ok(Self::Tool),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

/// A single part of a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// Raw image bytes with their MIME type
    Binary {
        mime_type: String,
        data: Vec<u8>,
    },
}

impl ContentPart {
    /// Create a text part
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a binary (image) part
    #[must_use]
    pub fn binary(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Binary {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// A chat message as supplied by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub role: Role,
    pub parts: Vec<ContentPart>,
}

impl MessageContent {
    /// Create a message with a single text part
    #[must_use]
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![ContentPart::text(text)],
        }
    }

    /// Create a new system message
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }

    /// Create a new human message
    #[must_use]
    pub fn human(text: impl Into<String>) -> Self {
        Self::text(Role::Human, text)
    }

    /// Create a new AI message
    #[must_use]
    pub fn ai(text: impl Into<String>) -> Self {
        Self::text(Role::Ai, text)
    }

    /// Append another part to this message
    #[must_use]
    pub fn with_part(mut self, part: ContentPart) -> Self {
        self.parts.push(part);
        self
    }
}

/// Kind of content carried by a flattened [`Message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
}

/// One message part in the form the codecs consume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Text, or base64 of the raw bytes for images
    pub content: String,
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Message {
    /// Create a text message
    #[must_use]
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            kind: MessageKind::Text,
            mime_type: None,
        }
    }

    /// Create an image message from raw bytes
    #[must_use]
    pub fn image(role: Role, mime_type: impl Into<String>, data: &[u8]) -> Self {
        Self {
            role,
            content: STANDARD.encode(data),
            kind: MessageKind::Image,
            mime_type: Some(mime_type.into()),
        }
    }

    /// Check whether this message carries text
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == MessageKind::Text
    }
}

/// Flatten caller messages into one [`Message`] per part, preserving order
#[must_use]
pub fn flatten_messages(messages: &[MessageContent]) -> Vec<Message> {
    messages
        .iter()
        .flat_map(|msg| {
            msg.parts.iter().map(move |part| match part {
                ContentPart::Text { text } => Message::text(msg.role, text.clone()),
                ContentPart::Binary { mime_type, data } => {
                    Message::image(msg.role, mime_type.clone(), data)
                }
            })
        })
        .collect()
}
